//! Environment variable helpers.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Any other value is returned verbatim. The variables read here are paths,
//!   and surrounding whitespace is part of a path.

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
