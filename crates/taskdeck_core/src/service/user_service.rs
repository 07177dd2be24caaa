//! User use-case service.
//!
//! # Responsibility
//! - Provide stable account entry points for transport callers.
//! - Delegate persistence and credential gating to the repository contract.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or credential checks.
//! - Returned values are always the public projection.

use crate::model::user::{NewUser, User};
use crate::repo::error::RepoResult;
use crate::repo::user_repo::{UserChanges, UserRepository};

/// Use-case service wrapper for account operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account.
    pub fn register(&self, new_user: &NewUser) -> RepoResult<User> {
        self.repo.register_user(new_user)
    }

    /// Verifies credentials and returns the account profile.
    pub fn login(&self, email: &str, password: &str) -> RepoResult<User> {
        self.repo.login_user(email, password)
    }

    /// Gets one account profile by id.
    pub fn profile(&self, id: i64) -> RepoResult<User> {
        self.repo.get_user(id)
    }

    /// Applies a sparse profile update; password changes require the
    /// current password in the payload.
    pub fn update_profile(&self, id: i64, changes: &UserChanges) -> RepoResult<User> {
        self.repo.update_user(id, changes)
    }

    /// Deletes the account after password re-verification.
    pub fn delete_account(&self, id: i64, password: &str) -> RepoResult<()> {
        self.repo.delete_user(id, password)
    }
}
