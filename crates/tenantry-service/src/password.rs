//! Password hashing using Argon2id.
//!
//! OWASP-recommended parameters (memory: 19 MiB, iterations: 2,
//! parallelism: 1) with a random salt per hash. An optional pepper is
//! prepended to the password.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use tenantry_core::error::{TenantryError, TenantryResult};

fn peppered(password: &str, pepper: Option<&str>) -> Vec<u8> {
    match pepper {
        Some(p) => format!("{p}{password}").into_bytes(),
        None => password.as_bytes().to_vec(),
    }
}

/// Hash a password into PHC string format.
pub fn hash_password(password: &str, pepper: Option<&str>) -> TenantryResult<String> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| TenantryError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(&peppered(password, pepper), &salt)
        .map_err(|e| TenantryError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a PHC hash.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// is malformed.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> TenantryResult<bool> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| TenantryError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(TenantryError::Crypto(format!("verify error: {e}"))),
    }
}
