//! User domain model.
//!
//! # Responsibility
//! - Define the public user projection and the registration input.
//!
//! # Invariants
//! - The stored credential digest is never part of the public projection.
//! - `email` is persisted in normalized form (trimmed, lower-cased).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public projection of a user row.
///
/// Deliberately excludes the password hash; this is the only user shape the
/// core hands back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Registration input.
///
/// The plaintext password lives only long enough to be strength-checked and
/// hashed; it is kept out of `Debug` output.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
