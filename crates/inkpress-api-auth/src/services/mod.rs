//! Services for the authentication endpoints.

mod auth_service;

pub use auth_service::AuthService;
