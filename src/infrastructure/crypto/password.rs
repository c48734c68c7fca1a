//! Password hashing utilities
//!
//! bcrypt with a configurable cost. bcrypt keys on at most 72 bytes
//! including the terminating NUL, so anything past `MAX_PASSWORD_BYTES` is a
//! `BcryptError::Truncation` rather than a silently shortened password.

use bcrypt::{non_truncating_hash, non_truncating_verify};

pub const MIN_WORK_FACTOR: u32 = 4;
pub const MAX_WORK_FACTOR: u32 = 31;
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hash a password using bcrypt with a fresh random salt
pub fn hash_password(password: &str, work_factor: u32) -> Result<String, bcrypt::BcryptError> {
    non_truncating_hash(password, work_factor)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    non_truncating_verify(password, hash)
}
