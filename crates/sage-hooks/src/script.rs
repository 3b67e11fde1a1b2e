//! Managed hook script generation and classification.

use regex::Regex;
use std::sync::LazyLock;

/// Marker line that identifies a script as Sage-managed. Hook-name
/// specific so a copied script is not misclassified under another name.
pub(crate) fn managed_marker(hook_name: &str) -> String {
    format!("# sage-hook: {hook_name} v1")
}

pub(crate) fn is_managed(content: &str, hook_name: &str) -> bool {
    content.contains(&managed_marker(hook_name))
}

static LEGACY_HOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^LEGACY_HOOK=(?:"([^"]*)"|'([^']*)'|([^\s#]*))\s*$"#)
        .expect("legacy hook regex")
});

/// Extract the chained legacy hook path recorded inside a managed script.
pub(crate) fn parse_legacy_hook_path(content: &str) -> Option<String> {
    let caps = LEGACY_HOOK_RE.captures(content)?;
    for i in 1..caps.len() {
        if let Some(m) = caps.get(i) {
            let value = m.as_str().trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Render the managed hook script.
///
/// Contract: always exits 0; serializes concurrent runs with an atomic
/// `mkdir` lock released via `trap` on every exit path; invokes `sage`
/// only if it is on PATH, with the repository path passed explicitly;
/// chains the recorded legacy hook with the original arguments.
pub(crate) fn render_hook_script(hook_name: &str, legacy_hook_path: Option<&str>, sync: bool) -> String {
    let legacy_line = match legacy_hook_path.map(str::trim) {
        Some(path) if !path.is_empty() => {
            format!("LEGACY_HOOK=\"{}\"", escape_double_quotes(path))
        }
        _ => "LEGACY_HOOK=\"\"".to_string(),
    };

    let sage_invoke = if sync {
        format!("sage hook {hook_name} --repo \"$REPO_DIR\" >/dev/null 2>&1 || true")
    } else {
        format!("( sage hook {hook_name} --repo \"$REPO_DIR\" >/dev/null 2>&1 || true ) &")
    };

    format!(
        r#"#!/bin/sh
{marker}

# Never block commits. If anything fails, exit 0.
{legacy_line}

# Best-effort reentrancy guard (no env vars).
REPO_DIR="$(pwd)"
HOOK_DIR="$(CDPATH= cd -- "$(dirname -- "$0")" 2>/dev/null && pwd)"
LOCK_DIR="$HOOK_DIR/.sage-{hook_name}.lock"
if ! mkdir "$LOCK_DIR" 2>/dev/null; then
	exit 0
fi
trap 'rmdir "$LOCK_DIR" 2>/dev/null || true' EXIT

if command -v sage >/dev/null 2>&1; then
	{sage_invoke}
fi

# Chain legacy hook if present (best-effort).
if [ -n "${{LEGACY_HOOK:-}}" ] && [ -x "${{LEGACY_HOOK}}" ]; then
	"${{LEGACY_HOOK}}" "$@" || true
fi

exit 0
"#,
        marker = managed_marker(hook_name),
    )
}

/// Minimal escaping; hook paths are file paths.
fn escape_double_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
