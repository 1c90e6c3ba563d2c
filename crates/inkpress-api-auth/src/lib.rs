//! Authentication API endpoints for inkpress.
//!
//! This crate provides the REST surface over the auth core:
//! - Registration (POST /auth/register)
//! - Login (POST /auth/login)
//! - Token refresh (POST /auth/refresh)
//! - Logout (POST /auth/logout)
//! - Password change (PUT /auth/password)
//! - Password reset (POST /auth/forgot-password, POST /auth/reset-password)
//! - Email verification (POST /auth/verify-email)
//! - Current account (GET /auth/me)
//!
//! Resource routes elsewhere in the application authenticate through
//! [`middleware::bearer_auth_middleware`] and authorize ownership through
//! the guard in [`router::AuthState`].
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::Router;
//! use inkpress_api_auth::router::{auth_router, AuthState};
//!
//! let app = Router::new().nest("/auth", auth_router(state));
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

// Re-export public API
pub use error::{ApiAuthError, ErrorResponse};
pub use extract::{CurrentUser, MaybeUser};
pub use middleware::{bearer_auth_middleware, bearer_token};
pub use models::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, MessageResponse, PasswordChangeRequest,
    RefreshRequest, RegisterRequest, ResetPasswordRequest, SessionResponse, TokenResponse,
    UserResponse, VerifyEmailRequest,
};
pub use router::{auth_router, AuthState};
pub use services::AuthService;
pub use store::{AccountRecord, AccountStore, InMemoryAccountStore};
