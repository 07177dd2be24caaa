//! Repository layer: ownership-scoped persistence for users, projects and
//! tasks.
//!
//! # Responsibility
//! - Define the data-access contracts and their SQLite implementations.
//! - Keep SQL assembly and constraint translation inside this boundary.
//!
//! # Invariants
//! - Every scoped statement binds its owner predicate; absent and unowned
//!   rows are both reported as `NotFound`.
//! - Validation runs before any statement executes; a failed update leaves
//!   no partial state.

pub mod error;
pub mod project_repo;
pub mod task_repo;
pub mod update;
pub mod user_repo;
