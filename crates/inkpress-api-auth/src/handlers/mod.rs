//! HTTP handlers for the authentication endpoints.

mod login;
mod logout;
mod me;
mod password;
mod refresh;
mod register;
mod verify_email;

pub use login::login_handler;
pub use logout::logout_handler;
pub use me::me_handler;
pub use password::{forgot_password_handler, password_change_handler, reset_password_handler};
pub use refresh::refresh_handler;
pub use register::register_handler;
pub use verify_email::verify_email_handler;
