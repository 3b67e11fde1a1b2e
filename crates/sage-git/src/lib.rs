//! Thin git subprocess layer.
//!
//! Every query shells out to `git`, always with the repository passed
//! explicitly via `-C` so behavior never depends on the implicit working
//! directory of the caller.

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run a git command and return its trimmed stdout.
///
/// When `repo` is `None` the command runs against the current directory.
pub fn git_output(repo: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    if let Some(repo) = repo {
        cmd.arg("-C").arg(repo);
    }
    cmd.args(args);

    let output = cmd
        .output()
        .with_context(|| format!("failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
        let mut msg = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if msg.is_empty() {
            msg = format!("exit status {:?}", output.status.code());
        }
        bail!("git {}: {}", args.join(" "), msg);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Absolute path of the repository worktree root.
pub fn repo_root(repo: Option<&Path>) -> Result<PathBuf> {
    let out = git_output(repo, &["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(out))
}

/// Absolute path of the `.git` directory.
pub fn git_dir(repo: Option<&Path>) -> Result<PathBuf> {
    let root = repo_root(repo)?;
    let gd = git_output(repo, &["rev-parse", "--git-dir"])?;

    let gd = PathBuf::from(gd);
    if gd.is_absolute() {
        Ok(gd)
    } else {
        Ok(root.join(gd))
    }
}

/// Resolve the hooks directory for a repository.
///
/// Returns the directory plus the raw `core.hooksPath` value when one is
/// configured, so callers can warn that the path may be shared across
/// repositories. A relative `core.hooksPath` is resolved against the
/// repository root.
pub fn hooks_dir(repo: Option<&Path>) -> Result<(PathBuf, Option<String>)> {
    let hooks_path = git_output(repo, &["config", "--get", "core.hooksPath"]).unwrap_or_default();
    if !hooks_path.trim().is_empty() {
        let raw = hooks_path.trim().to_string();
        let path = PathBuf::from(&raw);
        if path.is_absolute() {
            return Ok((path, Some(raw)));
        }
        let root = repo_root(repo)?;
        return Ok((root.join(path), Some(raw)));
    }

    Ok((git_dir(repo)?.join("hooks"), None))
}

/// Short, stable identity hash for a repository root path.
/// 10 bytes (20 hex chars) is enough to avoid collisions in practice.
pub fn repo_hash(root: &Path) -> String {
    let digest = Sha256::digest(root.to_string_lossy().as_bytes());
    digest[..10].iter().map(|b| format!("{b:02x}")).collect()
}
