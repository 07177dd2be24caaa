//! Credential hashing capability.
//!
//! # Responsibility
//! - One-way hashing of user secrets and verification against stored
//!   digests.
//!
//! # Invariants
//! - Plaintext secrets are never persisted or logged; only PHC-format
//!   digests leave this module.
//! - `verify` reports a mismatch as `Ok(false)`; only unexpected backend
//!   failures surface as errors.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type HashResult<T> = Result<T, HashError>;

/// Opaque hashing-backend failure. Carries no domain meaning; repositories
/// surface it as an internal error.
#[derive(Debug)]
pub struct HashError(String);

impl Display for HashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential hashing failed: {}", self.0)
    }
}

impl Error for HashError {}

/// Hashing capability injected into the user repository.
///
/// Kept as a trait so tests and transports can substitute cheaper or
/// deterministic implementations.
pub trait CredentialHasher {
    /// Hashes a secret into an opaque digest string.
    fn hash(&self, secret: &str) -> HashResult<String>;

    /// Verifies a secret against a stored digest.
    fn verify(&self, secret: &str, digest: &str) -> HashResult<bool>;
}

/// Argon2id-backed hasher producing salted PHC-string digests.
#[derive(Debug, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> HashResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| HashError(err.to_string()))?;
        Ok(digest.to_string())
    }

    fn verify(&self, secret: &str, digest: &str) -> HashResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|err| HashError(format!("stored digest unreadable: {err}")))?;
        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(HashError(err.to_string())),
        }
    }
}
