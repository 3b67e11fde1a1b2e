//! Project scope naming rules.
//!
//! The active scope comes from the process environment, but it is read
//! once at the CLI edge and threaded through as an explicit value so the
//! rest of the code stays free of implicit global state.

/// Project label used when no scope is active.
pub const DEFAULT_PROJECT: &str = "global";

/// Normalize a project name: trim, lowercase, spaces to dashes, and strip
/// leading/trailing dashes and underscores.
pub fn normalize_project_name(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(' ', "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Resolve the project filter for read commands.
///
/// Precedence: `--all` disables filtering > explicit `--project` > active
/// scope > no filter.
pub fn resolve_project_filter(
    explicit: Option<&str>,
    all: bool,
    active: Option<&str>,
) -> Option<String> {
    if all {
        return None;
    }
    if let Some(p) = explicit {
        let p = normalize_project_name(p);
        if !p.is_empty() {
            return Some(p);
        }
    }
    if let Some(p) = active {
        let p = normalize_project_name(p);
        if !p.is_empty() {
            return Some(p);
        }
    }
    None
}

/// Project for a new entry: the active scope, falling back to the default.
pub fn project_for_new_entry(active: Option<&str>) -> String {
    match active.map(normalize_project_name) {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_PROJECT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_project_name() {
        assert_eq!(normalize_project_name("  My Repo  "), "my-repo");
        assert_eq!(normalize_project_name("-sage_"), "sage");
        assert_eq!(normalize_project_name(""), "");
    }

    #[test]
    fn test_filter_precedence() {
        assert_eq!(resolve_project_filter(None, true, Some("env")), None);
        assert_eq!(
            resolve_project_filter(Some("Explicit"), false, Some("env")),
            Some("explicit".to_string())
        );
        assert_eq!(
            resolve_project_filter(None, false, Some("Env")),
            Some("env".to_string())
        );
        assert_eq!(resolve_project_filter(None, false, None), None);
    }

    #[test]
    fn test_project_for_new_entry() {
        assert_eq!(project_for_new_entry(None), "global");
        assert_eq!(project_for_new_entry(Some("  ")), "global");
        assert_eq!(project_for_new_entry(Some("Sage")), "sage");
    }
}
