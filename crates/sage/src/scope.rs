//! Active project scope.
//!
//! The scope is sourced from `SAGE_PROJECT` here, at the CLI edge, and
//! passed down explicitly; nothing below this layer reads the
//! environment.

use sage_core::normalize_project_name;

pub const SCOPE_ENV_VAR: &str = "SAGE_PROJECT";

/// Active project from the environment, normalized; `None` when unset or
/// empty.
pub fn active_project() -> Option<String> {
    let raw = std::env::var(SCOPE_ENV_VAR).ok()?;
    let normalized = normalize_project_name(&raw);
    if normalized.is_empty() { None } else { Some(normalized) }
}
