//! Password hashing with Argon2id.
//!
//! Used by identity provider implementations to store and check account
//! credentials. Parameters follow the OWASP recommendation: 19 MiB of
//! memory, 2 iterations, parallelism 1.

use crate::error::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

fn argon2() -> Argon2<'static> {
    // m=19456 KiB, t=2, p=1. Constant parameters; Params::new only fails
    // on out-of-range values.
    let params =
        Params::new(19_456, 2, 1, None).expect("recommended Argon2 parameters are valid");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password, producing a PHC-formatted string.
///
/// # Errors
///
/// Returns `AuthError::HashingFailed` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFailed(e.to_string()))
}

/// Verify a password against a PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; only an unparseable hash is an error.
///
/// # Errors
///
/// Returns `AuthError::InvalidHashFormat` if the stored hash cannot be
/// parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;
    Ok(argon2()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
