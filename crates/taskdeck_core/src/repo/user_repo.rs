//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Registration, login, profile reads and partial profile updates.
//! - Credential-gated password rotation and account deletion.
//!
//! # Invariants
//! - The password hash never leaves this module; all returns are the public
//!   projection.
//! - Password changes and account deletion require re-verification of the
//!   current secret.
//! - Duplicate emails surface as `Conflict { field: "email" }`, translated
//!   from the store's unique constraint.

use crate::auth::CredentialHasher;
use crate::model::user::{NewUser, User};
use crate::model::validate;
use crate::repo::error::{map_conflict, Entity, RepoError, RepoResult};
use crate::repo::update::{apply_text_fields, TextField, UpdateBuilder};
use log::{info, warn};
use rusqlite::{params, params_from_iter, Connection, Row};

/// Sparse profile update payload. `None` means "leave unchanged"; a present
/// value (even one that trims to empty) is an intent to set the field.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Requires `current_password` to also be present.
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("new_password", &self.new_password.as_ref().map(|_| "<redacted>"))
            .field(
                "current_password",
                &self.current_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Permitted profile fields, in placeholder order. The password rotation
/// sub-contract is handled separately and always sorts last.
const USER_TEXT_FIELDS: &[TextField<UserChanges>] = &[
    TextField {
        column: "name",
        get: |changes| changes.name.as_deref(),
        normalize: validate::trimmed,
        validate: validate::user_name,
    },
    TextField {
        column: "email",
        get: |changes| changes.email.as_deref(),
        normalize: validate::normalized_email,
        validate: validate::email_format,
    },
];

/// Repository interface for user operations.
pub trait UserRepository {
    /// Creates a user with a hashed credential and returns its projection.
    fn register_user(&self, new_user: &NewUser) -> RepoResult<User>;
    /// Verifies credentials by normalized email. Unknown email and wrong
    /// password are indistinguishable to the caller.
    fn login_user(&self, email: &str, password: &str) -> RepoResult<User>;
    /// Gets one user's public projection by id.
    fn get_user(&self, id: i64) -> RepoResult<User>;
    /// Applies a sparse profile update in one statement.
    fn update_user(&self, id: i64, changes: &UserChanges) -> RepoResult<User>;
    /// Deletes the account after re-verifying the current password.
    fn delete_user(&self, id: i64, password: &str) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'a> {
    conn: &'a Connection,
    hasher: &'a dyn CredentialHasher,
}

impl<'a> SqliteUserRepository<'a> {
    /// Constructs a repository from a migrated connection and a hashing
    /// capability.
    pub fn new(conn: &'a Connection, hasher: &'a dyn CredentialHasher) -> Self {
        Self { conn, hasher }
    }

    fn password_hash_by_id(&self, id: i64) -> RepoResult<String> {
        self.conn
            .query_row(
                "SELECT password_hash FROM users WHERE id = ?1;",
                params![id],
                |row| row.get::<_, String>(0),
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(Entity::User),
                other => other.into(),
            })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn register_user(&self, new_user: &NewUser) -> RepoResult<User> {
        let name = validate::trimmed(&new_user.name);
        validate::user_name(&name).map_err(RepoError::Validation)?;
        let email = validate::normalized_email(&new_user.email);
        validate::email_format(&email).map_err(RepoError::Validation)?;
        validate::password_strength(&new_user.password).map_err(RepoError::Validation)?;

        let digest = self.hasher.hash(&new_user.password)?;

        let mut stmt = self.conn.prepare(
            "INSERT INTO users (name, email, password_hash)
             VALUES (?1, ?2, ?3)
             RETURNING id, name, email;",
        )?;
        let user = stmt
            .query_row(params![name, email, digest], parse_user_row)
            .map_err(|err| map_conflict(err, "email", "email already registered"))?;

        info!(
            "event=user_register module=repo status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    fn login_user(&self, email: &str, password: &str) -> RepoResult<User> {
        let email = validate::normalized_email(email);

        let looked_up = self.conn.query_row(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?1;",
            params![email],
            |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    },
                    row.get::<_, String>(3)?,
                ))
            },
        );
        let (user, stored_hash) = match looked_up {
            Ok(found) => found,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                warn!("event=user_login module=repo status=denied reason=unknown_email");
                return Err(RepoError::InvalidCredential);
            }
            Err(err) => return Err(err.into()),
        };

        if !self.hasher.verify(password, &stored_hash)? {
            warn!(
                "event=user_login module=repo status=denied user_id={} reason=bad_password",
                user.id
            );
            return Err(RepoError::InvalidCredential);
        }

        info!("event=user_login module=repo status=ok user_id={}", user.id);
        Ok(user)
    }

    fn get_user(&self, id: i64) -> RepoResult<User> {
        self.conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1;",
                params![id],
                parse_user_row,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(Entity::User),
                other => other.into(),
            })
    }

    fn update_user(&self, id: i64, changes: &UserChanges) -> RepoResult<User> {
        let mut builder = UpdateBuilder::new();
        apply_text_fields(&mut builder, USER_TEXT_FIELDS, changes)?;

        if let Some(new_password) = changes.new_password.as_deref() {
            validate::password_strength(new_password)
                .map_err(|_| RepoError::Validation("new password is too weak".to_string()))?;
            let current = changes.current_password.as_deref().ok_or_else(|| {
                RepoError::Validation(
                    "current password is required to set a new password".to_string(),
                )
            })?;

            let stored_hash = self.password_hash_by_id(id)?;
            if !self.hasher.verify(current, &stored_hash)? {
                warn!(
                    "event=user_update module=repo status=denied user_id={id} reason=bad_current_password"
                );
                return Err(RepoError::InvalidCredential);
            }

            let digest = self.hasher.hash(new_password)?;
            builder.set("password_hash", digest);
        }

        if builder.is_empty() {
            return Err(RepoError::Validation("no fields to update".to_string()));
        }

        let set_clause = builder.set_clause();
        let id_pos = builder.bind_key(id);
        let sql = format!(
            "UPDATE users SET {set_clause} WHERE id = ?{id_pos} RETURNING id, name, email;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let user = stmt
            .query_row(params_from_iter(builder.into_values()), parse_user_row)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(Entity::User),
                other => map_conflict(other, "email", "email already in use"),
            })?;

        info!("event=user_update module=repo status=ok user_id={}", user.id);
        Ok(user)
    }

    fn delete_user(&self, id: i64, password: &str) -> RepoResult<()> {
        if password.is_empty() {
            return Err(RepoError::Validation(
                "password is required for deletion".to_string(),
            ));
        }

        let stored_hash = self.password_hash_by_id(id)?;
        if !self.hasher.verify(password, &stored_hash)? {
            warn!("event=user_delete module=repo status=denied user_id={id} reason=bad_password");
            return Err(RepoError::InvalidCredential);
        }

        // The row can vanish between verification and this statement; zero
        // affected rows reports NotFound, not success.
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(Entity::User));
        }

        info!("event=user_delete module=repo status=ok user_id={id}");
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
