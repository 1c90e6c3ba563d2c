//! Token signing and signature verification with HS256.
//!
//! The signer is a pure function over its configuration: it produces a
//! tamper-evident compact encoding of a claim set and performs the inverse
//! decoding. Signature validity is deliberately separated from current
//! validity: expiry and token-type checks belong to the verifier, so a
//! decoded claim set is "authentic" but not yet "acceptable".

use crate::claims::TokenClaims;
use crate::error::AuthError;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};

/// Signs and signature-checks token claim sets using a shared HMAC-SHA256
/// secret.
///
/// The algorithm is fixed per deployment: a token whose header names any
/// other algorithm is rejected, never verified with a different scheme.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material is deliberately not exposed.
        f.debug_struct("TokenSigner")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the secret is empty.
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidKey(
                "signing secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by the verifier, against the same clock as the
        // revocation check. The signer only answers "authentic or not".
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Encode a claim set into a signed compact token string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SigningFailed` if encoding fails.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::SigningFailed(e.to_string()))
    }

    /// Check the signature of a token and decode its claim set.
    ///
    /// Does **not** check expiry or token type.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidSignature` - MAC mismatch or wrong algorithm
    /// - `AuthError::MalformedToken` - not decodable as a compact token
    pub fn verify_and_decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data: TokenData<TokenClaims> =
            decode(token, &self.decoding, &self.validation).map_err(map_decode_error)?;
        Ok(data.claims)
    }
}

/// Map jsonwebtoken decode errors onto the error taxonomy.
fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        // A token signed under a different algorithm is indistinguishable
        // from a forgery as far as this deployment is concerned.
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::InvalidSignature
        }
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidToken => AuthError::MalformedToken("not a compact token".to_string()),
        ErrorKind::Base64(_) => AuthError::MalformedToken("invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => AuthError::MalformedToken("invalid claims payload".to_string()),
        ErrorKind::Utf8(_) => AuthError::MalformedToken("invalid utf-8 in payload".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::MalformedToken(format!("missing claim: {claim}"))
        }
        _ => AuthError::MalformedToken(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenType;
    use chrono::Utc;

    const TEST_SECRET: &[u8] = b"test-signing-secret-not-for-production";
    const OTHER_SECRET: &[u8] = b"a-completely-different-secret";

    fn signer() -> TokenSigner {
        TokenSigner::new(TEST_SECRET).unwrap()
    }

    #[test]
    fn empty_secret_rejected() {
        let result = TokenSigner::new(b"");
        assert!(matches!(result.unwrap_err(), AuthError::InvalidKey(_)));
    }

    #[test]
    fn sign_produces_three_part_token() {
        let claims = TokenClaims::builder().subject("user-1").build();
        let token = signer().sign(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let claims = TokenClaims::builder()
            .subject("user-1")
            .token_type(TokenType::Refresh)
            .name("alice")
            .build();

        let token = signer().sign(&claims).unwrap();
        let decoded = signer().verify_and_decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_yields_invalid_signature() {
        let claims = TokenClaims::builder().subject("user-1").build();
        let token = signer().sign(&claims).unwrap();

        let other = TokenSigner::new(OTHER_SECRET).unwrap();
        let result = other.verify_and_decode(&token);

        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn tampered_payload_yields_invalid_signature() {
        let claims = TokenClaims::builder().subject("user-1").build();
        let token = signer().sign(&claims).unwrap();

        // Flip one character in the payload segment.
        let first_dot = token.find('.').unwrap();
        let mut bytes = token.into_bytes();
        let i = first_dot + 2;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let result = signer().verify_and_decode(&tampered);
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn garbage_yields_malformed_token() {
        let result = signer().verify_and_decode("definitely not a token");
        assert!(matches!(result.unwrap_err(), AuthError::MalformedToken(_)));

        let result = signer().verify_and_decode("a.b.c.d");
        assert!(matches!(result.unwrap_err(), AuthError::MalformedToken(_)));
    }

    #[test]
    fn wrong_algorithm_fails_closed() {
        // Token claiming "alg": "none" with an empty signature.
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let claims = TokenClaims::builder().subject("user-1").build();
        let payload = {
            use jsonwebtoken::{encode, Header};
            // Reuse a properly signed token's payload segment.
            let token = encode(
                &Header::new(Algorithm::HS256),
                &claims,
                &EncodingKey::from_secret(TEST_SECRET),
            )
            .unwrap();
            token.split('.').nth(1).unwrap().to_string()
        };
        let forged = format!("{header}.{payload}.");

        let result = signer().verify_and_decode(&forged);
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_still_decodes() {
        // Signature validity is not current validity: the signer hands back
        // an expired claim set and the verifier rejects it.
        let claims = TokenClaims::builder()
            .subject("user-1")
            .expiration(Utc::now().timestamp() - 3600)
            .build();

        let token = signer().sign(&claims).unwrap();
        let decoded = signer().verify_and_decode(&token).unwrap();
        assert!(decoded.is_expired());
    }
}
