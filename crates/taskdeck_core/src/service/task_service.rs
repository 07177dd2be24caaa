//! Task use-case service.
//!
//! # Responsibility
//! - Provide ownership-scoped task entry points for transport callers.
//!
//! # Invariants
//! - Visibility always resolves through the parent project's owner.

use crate::model::task::Task;
use crate::repo::error::RepoResult;
use crate::repo::task_repo::{TaskChanges, TaskRepository};

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task under a project the acting user owns.
    pub fn create(&self, project_id: i64, user_id: i64, title: &str) -> RepoResult<Task> {
        self.repo.create_task(project_id, user_id, title)
    }

    /// Gets one task visible to the acting user.
    pub fn get(&self, id: i64, user_id: i64) -> RepoResult<Task> {
        self.repo.get_task(id, user_id)
    }

    /// Lists a project's tasks, newest first.
    pub fn by_project(&self, project_id: i64, user_id: i64) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks_by_project(project_id, user_id)
    }

    /// Lists tasks assigned to a user within the acting user's projects.
    pub fn by_assignee(&self, assigned_to: i64, user_id: i64) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks_by_assignee(assigned_to, user_id)
    }

    /// Applies a sparse update to a visible task.
    pub fn update(&self, id: i64, user_id: i64, changes: &TaskChanges) -> RepoResult<Task> {
        self.repo.update_task(id, user_id, changes)
    }

    /// Deletes a visible task.
    pub fn delete(&self, id: i64, user_id: i64) -> RepoResult<()> {
        self.repo.delete_task(id, user_id)
    }
}
