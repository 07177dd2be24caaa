//! Partial-update statement builder.
//!
//! # Responsibility
//! - Assemble `SET` fragments and positional bind values from sparse update
//!   payloads.
//! - Run per-field normalization and validation before any SQL executes.
//!
//! # Invariants
//! - Placeholders are assigned sequentially from 1, in descriptor
//!   declaration order, so a given present-field set always produces the
//!   same statement shape.
//! - Column names come only from `const` descriptor tables; caller data is
//!   always bound, never interpolated.
//! - Key predicate values are appended after all field values, id first,
//!   owner id second.

use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::Value;

/// Accumulates `column = ?N` assignments and their bind values for one
/// UPDATE statement.
pub(crate) struct UpdateBuilder {
    assignments: Vec<String>,
    values: Vec<Value>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Adds one assignment, allocating the next placeholder position.
    pub fn set(&mut self, column: &'static str, value: impl Into<Value>) {
        let position = self.values.len() + 1;
        self.assignments.push(format!("{column} = ?{position}"));
        self.values.push(value.into());
    }

    /// True when no permitted field was present in the payload.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Joined `SET` clause for the accumulated assignments.
    pub fn set_clause(&self) -> String {
        self.assignments.join(", ")
    }

    /// Appends a row-key bind value after the field values and returns its
    /// placeholder position for use in the WHERE clause.
    pub fn bind_key(&mut self, key: i64) -> usize {
        self.values.push(Value::Integer(key));
        self.values.len()
    }

    /// Consumes the builder, yielding the full ordered bind list.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Descriptor for one permitted text field of a sparse payload `P`.
///
/// Declared in `const` tables per entity; iteration order of the table is
/// the placeholder order.
pub(crate) struct TextField<P> {
    pub column: &'static str,
    pub get: fn(&P) -> Option<&str>,
    pub normalize: fn(&str) -> String,
    pub validate: fn(&str) -> Result<(), String>,
}

/// Applies a descriptor table to a payload: absent fields are skipped,
/// present fields are normalized, validated and pushed onto the builder.
///
/// Fails with `Validation` on the first rule violation, before any
/// statement has been issued.
pub(crate) fn apply_text_fields<P>(
    builder: &mut UpdateBuilder,
    fields: &[TextField<P>],
    payload: &P,
) -> RepoResult<()> {
    for field in fields {
        if let Some(raw) = (field.get)(payload) {
            let value = (field.normalize)(raw);
            (field.validate)(&value).map_err(RepoError::Validation)?;
            builder.set(field.column, value);
        }
    }
    Ok(())
}
