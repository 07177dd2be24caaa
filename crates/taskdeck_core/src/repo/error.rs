//! Shared repository error taxonomy.
//!
//! # Responsibility
//! - Define the domain error kinds every repository operation returns.
//! - Translate SQLite unique-violation failures into domain conflicts.
//!
//! # Invariants
//! - `NotFound` deliberately conflates "row absent" and "row not owned by
//!   the caller"; scoped operations must not leak which one occurred.
//! - Only unique violations are translated; other constraint failures stay
//!   internal storage errors.

use crate::auth::HashError;
use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity named by `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Project,
    Task,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Task => "task",
        };
        write!(f, "{label}")
    }
}

/// Domain error for repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input failed a field rule; the message names field and reason.
    Validation(String),
    /// Target row absent, or present but not owned by the acting user.
    NotFound(Entity),
    /// A unique constraint rejected the write; `field` names the conflicting
    /// field.
    Conflict {
        field: &'static str,
        message: String,
    },
    /// Secret verification failed (login, rotation, account deletion).
    InvalidCredential,
    /// Unexpected storage failure.
    Db(DbError),
    /// Unexpected non-storage failure (hashing backend, corrupt row data).
    Internal(String),
}

impl RepoError {
    /// Stable kind discriminator for transports and log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::InvalidCredential => "invalid_credential",
            Self::Db(_) | Self::Internal(_) => "internal",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Conflict { message, .. } => write!(f, "{message}"),
            Self::InvalidCredential => write!(f, "invalid credentials"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<HashError> for RepoError {
    fn from(value: HashError) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Returns whether a SQLite failure is a unique-constraint rejection.
///
/// SQLite reports all constraint classes under one primary code; the
/// message prefix identifies the unique case.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && message.starts_with("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// Maps a statement failure to a domain conflict when it is a unique
/// violation, and to an internal storage error otherwise.
pub(crate) fn map_conflict(
    err: rusqlite::Error,
    field: &'static str,
    message: &str,
) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Conflict {
            field,
            message: message.to_string(),
        };
    }
    err.into()
}
