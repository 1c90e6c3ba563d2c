//! Bearer authentication middleware.
//!
//! Extracts the access token from the Authorization header, verifies it,
//! and inserts the resulting `TokenClaims` and `Identity` into request
//! extensions for handlers and extractors downstream.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use inkpress_auth::{AuthError, Identity, TokenType, TokenVerifier};

use crate::error::ApiAuthError;

/// Pull the bearer token out of the Authorization header.
///
/// Distinguishes three cases the error taxonomy keeps apart: no header at
/// all (`MissingToken`), a header that is not a bearer credential, and an
/// empty credential (both `MalformedToken`).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| {
        AuthError::MalformedToken("authorization header is not valid utf-8".to_string())
    })?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AuthError::MalformedToken("authorization header is not a bearer credential".to_string())
    })?;

    if token.is_empty() {
        return Err(AuthError::MalformedToken("empty bearer token".to_string()));
    }

    Ok(token)
}

/// Access-token authentication middleware.
///
/// Expects a `TokenVerifier` in the request extensions (layered by the
/// router). On success the request continues with `TokenClaims` and
/// `Identity` inserted; any failure answers immediately with the mapped
/// status.
///
/// # Usage
///
/// ```rust,ignore
/// use axum::{middleware, routing::get, Extension, Router};
/// use inkpress_api_auth::middleware::bearer_auth_middleware;
///
/// let router = Router::new()
///     .route("/me", get(me_handler))
///     .layer(middleware::from_fn(bearer_auth_middleware))
///     .layer(Extension(verifier));
/// ```
pub async fn bearer_auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let verifier = request
        .extensions()
        .get::<TokenVerifier>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("token verifier not configured on this route");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error",
            )
                .into_response()
        })?;

    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return Err(ApiAuthError::Auth(e).into_response()),
    };

    let claims = verifier
        .verify_claims(&token, TokenType::Access)
        .await
        .map_err(|e| ApiAuthError::Auth(e).into_response())?;

    let identity =
        Identity::from_claims(&claims).map_err(|e| ApiAuthError::Auth(e).into_response())?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn missing_header_is_missing_token() {
        let err = bearer_token(&headers_with(None)).unwrap_err();
        assert_eq!(err, AuthError::MissingToken);
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        let err = bearer_token(&headers_with(Some("Basic dXNlcjpwdw=="))).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn empty_bearer_token_is_malformed() {
        let err = bearer_token(&headers_with(Some("Bearer "))).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with(Some("Bearer abc.def.ghi"));
        let token = bearer_token(&headers).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
