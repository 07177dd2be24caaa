//! Field normalizers and validators.
//!
//! # Responsibility
//! - Provide the per-field rules used by creation paths and by the
//!   partial-update descriptor tables.
//!
//! # Invariants
//! - Normalizers never fail; validators run on already-normalized values.
//! - An empty string after trimming is a validation failure for required
//!   text fields, not an empty update.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Trims surrounding whitespace.
pub fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Normalizes an email address: trimmed and lower-cased.
pub fn normalized_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// A user name must be non-empty after trimming.
pub fn user_name(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    Ok(())
}

/// Email format check, applied after normalization.
pub fn email_format(value: &str) -> Result<(), String> {
    if !EMAIL_RE.is_match(value) {
        return Err("invalid email format".to_string());
    }
    Ok(())
}

/// Password strength: at least 8 characters, one uppercase letter and one
/// digit.
pub fn password_strength(value: &str) -> Result<(), String> {
    let long_enough = value.chars().count() >= 8;
    let has_uppercase = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !(long_enough && has_uppercase && has_digit) {
        return Err(
            "password must be 8+ characters and include an uppercase letter and a digit"
                .to_string(),
        );
    }
    Ok(())
}

/// A project name must be non-empty after trimming.
pub fn project_name(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("project name cannot be empty".to_string());
    }
    Ok(())
}

/// A task title must be non-empty after trimming.
pub fn task_title(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("title cannot be empty".to_string());
    }
    Ok(())
}

/// Accepts any value. Used by optional free-text fields whose only rule is
/// normalization.
pub fn always_valid(_value: &str) -> Result<(), String> {
    Ok(())
}
