//! Commit event producer.
//!
//! Turns "a commit just happened in repository R" into exactly one event.
//! The event id is a pure function of (repository identity, commit sha),
//! so re-running the producer for the same commit collides on append and
//! is absorbed as already-recorded. Everything here is best-effort: a
//! missing repository or sha is a silent no-op, and partial metadata
//! failures degrade to empty fields.

use chrono::{DateTime, Utc};
use sage_core::{DEFAULT_PROJECT, EntryKind, Event, normalize_project_name};
use sage_git::{git_output, repo_hash, repo_root};
use sage_store::Store;
use std::collections::BTreeMap;
use std::path::Path;

/// Derive the commit event for HEAD of `repo`. Returns `None` when there
/// is nothing to record (no repository, or no resolvable sha).
pub fn commit_event(repo: Option<&Path>) -> Option<Event> {
    let root = repo_root(repo).ok()?;

    let mut project = normalize_project_name(
        &root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    if project.is_empty() {
        project = DEFAULT_PROJECT.to_string();
    }

    let sha = git_output(repo, &["rev-parse", "HEAD"]).ok()?;

    let subject = git_output(repo, &["show", "-s", "--format=%s", "HEAD"]).unwrap_or_default();
    let body = git_output(repo, &["show", "-s", "--format=%b", "HEAD"]).unwrap_or_default();
    let author_name = git_output(repo, &["show", "-s", "--format=%an", "HEAD"]).unwrap_or_default();
    let author_email =
        git_output(repo, &["show", "-s", "--format=%ae", "HEAD"]).unwrap_or_default();
    let commit_time_raw =
        git_output(repo, &["show", "-s", "--format=%aI", "HEAD"]).unwrap_or_default();
    let branch = git_output(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_default();

    // Prefer the author time; fall back to wall clock.
    let timestamp = DateTime::parse_from_rfc3339(commit_time_raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    let repo_id = repo_hash(&root);
    let id = format!("git:{repo_id}:{sha}");

    let mut title = subject.trim().to_string();
    if title.is_empty() {
        title = "(no subject)".to_string();
    }

    let mut metadata = BTreeMap::new();
    metadata.insert("repo_root".to_string(), root.to_string_lossy().into_owned());
    metadata.insert("repo_id".to_string(), repo_id);
    metadata.insert("sha".to_string(), sha.clone());
    metadata.insert("branch".to_string(), branch.clone());
    metadata.insert("author_name".to_string(), author_name);
    metadata.insert("author_email".to_string(), author_email);
    metadata.insert("commit_time".to_string(), commit_time_raw);

    Some(Event {
        seq: 0,
        id,
        timestamp,
        project,
        kind: EntryKind::Commit,
        title,
        content: build_commit_content(&sha, &branch, body.trim()),
        tags: vec!["git".to_string(), "commit".to_string()],
        metadata,
    })
}

/// Record HEAD of `repo` into the store. Duplicate ids mean the commit is
/// already recorded; any failure is swallowed because hook-triggered
/// paths must never surface errors.
pub fn record_post_commit(repo: Option<&Path>, store: &Store) {
    if let Some(event) = commit_event(repo) {
        let _ = store.append(&event);
    }
}

fn build_commit_content(sha: &str, branch: &str, body: &str) -> String {
    let mut lines = Vec::new();
    if !sha.trim().is_empty() {
        lines.push(format!("sha: {}", sha.trim()));
    }
    if !branch.trim().is_empty() {
        lines.push(format!("branch: {}", branch.trim()));
    }
    if !body.is_empty() {
        lines.push(String::new());
        lines.push(body.to_string());
    }
    lines.join("\n").trim().to_string()
}
