//! Axum extractors for authenticated handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use inkpress_auth::{AuthorizationGuard, Identity};

use crate::error::ApiAuthError;
use crate::middleware::bearer_token;

/// The authenticated caller, as placed in request extensions by the bearer
/// middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                ApiAuthError::Internal("authentication middleware not applied".to_string())
            })
    }
}

/// Optional caller identity for routes that serve both anonymous and
/// authenticated requests.
///
/// No Authorization header yields `None`; a valid access token yields the
/// identity; a present-but-invalid token is rejected rather than treated
/// as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let guard = parts
            .extensions
            .get::<AuthorizationGuard>()
            .cloned()
            .ok_or_else(|| {
                ApiAuthError::Internal("authorization guard not configured".to_string())
            })?;

        let bearer = match bearer_token(&parts.headers) {
            Ok(token) => Some(token.to_string()),
            Err(inkpress_auth::AuthError::MissingToken) => None,
            Err(e) => return Err(ApiAuthError::Auth(e)),
        };

        let identity = guard.authorize_optional(bearer.as_deref()).await?;
        Ok(MaybeUser(identity))
    }
}
