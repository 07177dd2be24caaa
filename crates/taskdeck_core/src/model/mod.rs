//! Domain models for users, projects and tasks.
//!
//! # Responsibility
//! - Define the public projections returned to callers.
//! - Own field-level validation and normalization rules.
//!
//! # Invariants
//! - Projections never carry credential material.
//! - Every row is identified by a store-assigned integer id.

pub mod project;
pub mod task;
pub mod user;
pub mod validate;
