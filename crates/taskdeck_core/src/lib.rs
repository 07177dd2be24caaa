//! Core domain logic for taskdeck.
//! This crate is the single source of truth for business invariants:
//! ownership-scoped access to users, projects and tasks, credential-gated
//! mutation, and partial-update semantics.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Argon2Hasher, CredentialHasher, HashError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::Project;
pub use model::task::{Task, TaskPriority, TaskStatus};
pub use model::user::{NewUser, User};
pub use repo::error::{Entity, RepoError, RepoResult};
pub use repo::project_repo::{ProjectChanges, ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskChanges, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserChanges, UserRepository};
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
