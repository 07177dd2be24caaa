//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Owner-scoped create/get/update/delete for projects.
//!
//! # Invariants
//! - Every read, update and delete matches `user_id` in the statement and
//!   binds it in the argument list.
//! - `(user_id, name)` uniqueness violations surface as
//!   `Conflict { field: "name" }`.
//! - Owner existence on create is enforced by the foreign key, not
//!   pre-checked.

use crate::model::project::Project;
use crate::model::validate;
use crate::repo::error::{map_conflict, Entity, RepoError, RepoResult};
use crate::repo::update::{apply_text_fields, TextField, UpdateBuilder};
use log::info;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Sparse project update payload. A present `description` that trims to
/// empty still sets the column; only absence leaves it unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Permitted project fields, in placeholder order.
const PROJECT_TEXT_FIELDS: &[TextField<ProjectChanges>] = &[
    TextField {
        column: "name",
        get: |changes| changes.name.as_deref(),
        normalize: validate::trimmed,
        validate: validate::project_name,
    },
    TextField {
        column: "description",
        get: |changes| changes.description.as_deref(),
        normalize: validate::trimmed,
        validate: validate::always_valid,
    },
];

/// Repository interface for owner-scoped project operations.
pub trait ProjectRepository {
    /// Creates a project owned by `user_id`.
    fn create_project(&self, user_id: i64, name: &str) -> RepoResult<Project>;
    /// Gets one project, only when owned by `user_id`.
    fn get_project(&self, id: i64, user_id: i64) -> RepoResult<Project>;
    /// Applies a sparse update, scoped by id and owner.
    fn update_project(&self, id: i64, user_id: i64, changes: &ProjectChanges)
        -> RepoResult<Project>;
    /// Deletes one project, only when owned by `user_id`.
    fn delete_project(&self, id: i64, user_id: i64) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, user_id: i64, name: &str) -> RepoResult<Project> {
        let name = validate::trimmed(name);
        validate::project_name(&name).map_err(RepoError::Validation)?;

        let mut stmt = self.conn.prepare(
            "INSERT INTO projects (name, user_id)
             VALUES (?1, ?2)
             RETURNING id, name, user_id, description;",
        )?;
        let project = stmt
            .query_row(params![name, user_id], parse_project_row)
            .map_err(|err| map_conflict(err, "name", "project name already exists for this user"))?;

        info!(
            "event=project_create module=repo status=ok project_id={} user_id={user_id}",
            project.id
        );
        Ok(project)
    }

    fn get_project(&self, id: i64, user_id: i64) -> RepoResult<Project> {
        self.conn
            .query_row(
                "SELECT id, name, user_id, description
                 FROM projects
                 WHERE id = ?1 AND user_id = ?2;",
                params![id, user_id],
                parse_project_row,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(Entity::Project),
                other => other.into(),
            })
    }

    fn update_project(
        &self,
        id: i64,
        user_id: i64,
        changes: &ProjectChanges,
    ) -> RepoResult<Project> {
        let mut builder = UpdateBuilder::new();
        apply_text_fields(&mut builder, PROJECT_TEXT_FIELDS, changes)?;

        if builder.is_empty() {
            return Err(RepoError::Validation("no fields to update".to_string()));
        }

        let set_clause = builder.set_clause();
        let id_pos = builder.bind_key(id);
        let owner_pos = builder.bind_key(user_id);
        let sql = format!(
            "UPDATE projects SET {set_clause}
             WHERE id = ?{id_pos} AND user_id = ?{owner_pos}
             RETURNING id, name, user_id, description;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let project = stmt
            .query_row(params_from_iter(builder.into_values()), parse_project_row)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(Entity::Project),
                other => map_conflict(other, "name", "project name already exists for this user"),
            })?;

        info!("event=project_update module=repo status=ok project_id={id} user_id={user_id}");
        Ok(project)
    }

    fn delete_project(&self, id: i64, user_id: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE id = ?1 AND user_id = ?2;",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(Entity::Project));
        }

        info!("event=project_delete module=repo status=ok project_id={id} user_id={user_id}");
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        user_id: row.get(2)?,
        description: row.get(3)?,
    })
}
