//! Project use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped project entry points for transport callers.
//!
//! # Invariants
//! - Every call carries the acting user id; unowned rows read as absent.

use crate::model::project::Project;
use crate::repo::error::RepoResult;
use crate::repo::project_repo::{ProjectChanges, ProjectRepository};

/// Use-case service wrapper for project operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a project owned by the acting user.
    pub fn create(&self, user_id: i64, name: &str) -> RepoResult<Project> {
        self.repo.create_project(user_id, name)
    }

    /// Gets one project the acting user owns.
    pub fn get(&self, id: i64, user_id: i64) -> RepoResult<Project> {
        self.repo.get_project(id, user_id)
    }

    /// Applies a sparse update to an owned project.
    pub fn update(&self, id: i64, user_id: i64, changes: &ProjectChanges) -> RepoResult<Project> {
        self.repo.update_project(id, user_id, changes)
    }

    /// Deletes an owned project and, via cascade, its tasks.
    pub fn delete(&self, id: i64, user_id: i64) -> RepoResult<()> {
        self.repo.delete_project(id, user_id)
    }
}
