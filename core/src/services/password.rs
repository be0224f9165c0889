//! Password hashing with bcrypt.

use crate::errors::DomainError;

/// bcrypt work factor used for every stored password
pub const BCRYPT_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
