//! Project domain model.

use serde::{Deserialize, Serialize};

/// Public projection of a project row.
///
/// `user_id` is the owning user and is immutable after creation; every
/// scoped operation matches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub description: Option<String>,
}
