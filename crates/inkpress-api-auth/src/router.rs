//! Authentication router configuration.
//!
//! Routes:
//! - `POST /auth/register` - Create an account
//! - `POST /auth/login` - Authenticate and issue a token pair
//! - `POST /auth/refresh` - Exchange a refresh token for a new pair
//! - `POST /auth/forgot-password` - Request a password reset token
//! - `POST /auth/reset-password` - Redeem a password reset token
//! - `POST /auth/verify-email` - Redeem an email verification token
//! - `POST /auth/logout` - Retire the caller's tokens (authenticated)
//! - `PUT /auth/password` - Change password (authenticated)
//! - `GET /auth/me` - Current account (authenticated)

use crate::handlers::{
    forgot_password_handler, login_handler, logout_handler, me_handler, password_change_handler,
    refresh_handler, register_handler, reset_password_handler, verify_email_handler,
};
use crate::middleware::bearer_auth_middleware;
use crate::services::AuthService;
use crate::store::AccountStore;
use axum::{
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use inkpress_auth::{
    AuthError, AuthorizationGuard, IdentityProvider, IssuerConfig, RevocationStore, TokenIssuer,
    TokenSigner, TokenVerifier,
};
use std::sync::Arc;

/// Shared state for the authentication routes.
#[derive(Clone)]
pub struct AuthState {
    /// Service behind the handlers.
    pub auth_service: Arc<AuthService>,
    /// Verifier consulted by the bearer middleware.
    pub verifier: TokenVerifier,
    /// Guard for ownership checks on resource routes.
    pub guard: AuthorizationGuard,
}

impl AuthState {
    /// Wire up the auth stack over the given collaborators.
    ///
    /// `store` and `provider` are usually the same object seen through two
    /// interfaces; they are injected separately so a deployment can split
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the signing secret is unusable.
    pub fn new(
        secret: &[u8],
        config: IssuerConfig,
        store: Arc<dyn AccountStore>,
        provider: Arc<dyn IdentityProvider>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Result<Self, AuthError> {
        let signer = Arc::new(TokenSigner::new(secret)?);
        let issuer = TokenIssuer::new(signer.clone(), config);
        let verifier = TokenVerifier::new(signer, revocations.clone());
        let guard = AuthorizationGuard::new(Arc::new(verifier.clone()), provider.clone());
        let auth_service = Arc::new(AuthService::new(
            store,
            provider,
            issuer,
            verifier.clone(),
            revocations,
        ));

        Ok(Self {
            auth_service,
            verifier,
            guard,
        })
    }
}

/// Build the authentication router.
///
/// Mount under `/auth`:
///
/// ```rust,ignore
/// let app = Router::new().nest("/auth", auth_router(state));
/// ```
pub fn auth_router(state: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/forgot-password", post(forgot_password_handler))
        .route("/reset-password", post(reset_password_handler))
        .route("/verify-email", post(verify_email_handler));

    let protected_routes = Router::new()
        .route("/logout", post(logout_handler))
        .route("/password", put(password_change_handler))
        .route("/me", get(me_handler))
        .layer(middleware::from_fn(bearer_auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(state.auth_service))
        .layer(Extension(state.verifier))
        .layer(Extension(state.guard))
}
