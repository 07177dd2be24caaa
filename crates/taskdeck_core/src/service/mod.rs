//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod project_service;
pub mod task_service;
pub mod user_service;
