//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Task create/read/update/delete scoped through project ownership.
//! - Collection reads by project and by assignee, newest first.
//!
//! # Invariants
//! - Ownership is transitive: every statement resolves the acting user
//!   through the parent project, never through the task row alone.
//! - Creating a task pre-checks project ownership explicitly; the foreign
//!   key cannot encode it.
//! - List results are ordered `created_at DESC, id DESC`.

use crate::model::task::{Task, TaskPriority, TaskStatus};
use crate::model::validate;
use crate::repo::error::{Entity, RepoError, RepoResult};
use crate::repo::update::{apply_text_fields, TextField, UpdateBuilder};
use log::info;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_COLUMNS: &str = "id, project_id, title, assigned_to, status, priority, created_at";

/// Sparse task update payload.
///
/// `assigned_to` nests two options: the outer one is the presence bit of
/// the sparse payload, the inner one is the column's nullability, so
/// `Some(None)` unassigns while `None` leaves the assignee unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Option<i64>>,
}

/// Permitted task text fields, in placeholder order. Status, priority and
/// assignee follow in that order; they are typed, not free text.
const TASK_TEXT_FIELDS: &[TextField<TaskChanges>] = &[TextField {
    column: "title",
    get: |changes| changes.title.as_deref(),
    normalize: validate::trimmed,
    validate: validate::task_title,
}];

/// Repository interface for ownership-scoped task operations.
pub trait TaskRepository {
    /// Creates a task under a project the acting user owns.
    fn create_task(&self, project_id: i64, user_id: i64, title: &str) -> RepoResult<Task>;
    /// Gets one task, resolved through project ownership.
    fn get_task(&self, id: i64, user_id: i64) -> RepoResult<Task>;
    /// Lists a project's tasks, newest first. An empty result is `NotFound`.
    fn list_tasks_by_project(&self, project_id: i64, user_id: i64) -> RepoResult<Vec<Task>>;
    /// Lists tasks assigned to a user, within the acting user's projects.
    fn list_tasks_by_assignee(&self, assigned_to: i64, user_id: i64) -> RepoResult<Vec<Task>>;
    /// Applies a sparse update, scoped through project ownership.
    fn update_task(&self, id: i64, user_id: i64, changes: &TaskChanges) -> RepoResult<Task>;
    /// Deletes one task, scoped through project ownership.
    fn delete_task(&self, id: i64, user_id: i64) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect_tasks(
        &self,
        sql: &str,
        filter_id: i64,
        user_id: i64,
    ) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![filter_id, user_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, project_id: i64, user_id: i64, title: &str) -> RepoResult<Task> {
        let title = validate::trimmed(title);
        validate::task_title(&title).map_err(RepoError::Validation)?;

        // A foreign key would only prove the project exists, not that the
        // acting user owns it.
        let owned = self.conn.query_row(
            "SELECT id FROM projects WHERE id = ?1 AND user_id = ?2;",
            params![project_id, user_id],
            |row| row.get::<_, i64>(0),
        );
        match owned {
            Ok(_) => {}
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(RepoError::NotFound(Entity::Project));
            }
            Err(err) => return Err(err.into()),
        }

        let sql = format!(
            "INSERT INTO tasks (project_id, title)
             VALUES (?1, ?2)
             RETURNING {TASK_COLUMNS};"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![project_id, title])?;
        let row = rows
            .next()?
            .ok_or_else(|| RepoError::Internal("insert returned no row".to_string()))?;
        let task = parse_task_row(row)?;

        info!(
            "event=task_create module=repo status=ok task_id={} project_id={project_id}",
            task.id
        );
        Ok(task)
    }

    fn get_task(&self, id: i64, user_id: i64) -> RepoResult<Task> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.project_id, t.title, t.assigned_to, t.status, t.priority, t.created_at
             FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.id = ?1 AND p.user_id = ?2;",
        )?;
        let mut rows = stmt.query(params![id, user_id])?;
        if let Some(row) = rows.next()? {
            return parse_task_row(row);
        }
        Err(RepoError::NotFound(Entity::Task))
    }

    fn list_tasks_by_project(&self, project_id: i64, user_id: i64) -> RepoResult<Vec<Task>> {
        let tasks = self.collect_tasks(
            "SELECT t.id, t.project_id, t.title, t.assigned_to, t.status, t.priority, t.created_at
             FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = ?1 AND p.user_id = ?2
             ORDER BY t.created_at DESC, t.id DESC;",
            project_id,
            user_id,
        )?;
        if tasks.is_empty() {
            return Err(RepoError::NotFound(Entity::Task));
        }
        Ok(tasks)
    }

    fn list_tasks_by_assignee(&self, assigned_to: i64, user_id: i64) -> RepoResult<Vec<Task>> {
        let tasks = self.collect_tasks(
            "SELECT t.id, t.project_id, t.title, t.assigned_to, t.status, t.priority, t.created_at
             FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.assigned_to = ?1 AND p.user_id = ?2
             ORDER BY t.created_at DESC, t.id DESC;",
            assigned_to,
            user_id,
        )?;
        if tasks.is_empty() {
            return Err(RepoError::NotFound(Entity::Task));
        }
        Ok(tasks)
    }

    fn update_task(&self, id: i64, user_id: i64, changes: &TaskChanges) -> RepoResult<Task> {
        let mut builder = UpdateBuilder::new();
        apply_text_fields(&mut builder, TASK_TEXT_FIELDS, changes)?;

        if let Some(status) = changes.status {
            builder.set("status", status.as_db_str().to_string());
        }
        if let Some(priority) = changes.priority {
            builder.set("priority", priority.as_db_str().to_string());
        }
        if let Some(assigned_to) = changes.assigned_to {
            builder.set("assigned_to", assigned_to);
        }

        if builder.is_empty() {
            return Err(RepoError::Validation("no fields to update".to_string()));
        }

        let set_clause = builder.set_clause();
        let id_pos = builder.bind_key(id);
        let owner_pos = builder.bind_key(user_id);
        let sql = format!(
            "UPDATE tasks SET {set_clause}
             WHERE id = ?{id_pos}
               AND project_id IN (SELECT id FROM projects WHERE user_id = ?{owner_pos})
             RETURNING {TASK_COLUMNS};"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(builder.into_values()))?;
        let row = match rows.next()? {
            Some(row) => row,
            None => return Err(RepoError::NotFound(Entity::Task)),
        };
        let task = parse_task_row(row)?;

        info!("event=task_update module=repo status=ok task_id={id} user_id={user_id}");
        Ok(task)
    }

    fn delete_task(&self, id: i64, user_id: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks
             WHERE id = ?1
               AND project_id IN (SELECT id FROM projects WHERE user_id = ?2);",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(Entity::Task));
        }

        info!("event=task_delete module=repo status=ok task_id={id} user_id={user_id}");
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get(4)?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::Internal(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get(5)?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::Internal(format!(
            "invalid task priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        assigned_to: row.get(3)?,
        status,
        priority,
        created_at: row.get(6)?,
    })
}
