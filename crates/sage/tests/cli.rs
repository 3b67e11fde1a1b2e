//! End-to-end CLI tests against a temporary Sage home.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn sage(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sage").unwrap();
    cmd.env("SAGE_HOME", home).env_remove("SAGE_PROJECT");
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "dev@example.com"]);
    git(dir, &["config", "user.name", "Dev"]);
}

fn seed_legacy_store(home: &Path, dir_name: &str, title: &str) {
    let dir = home.join(dir_name);
    std::fs::create_dir_all(&dir).unwrap();
    let store = sage_store::Store::open(dir.join("sage.db")).unwrap();
    store
        .append(&sage_core::Event {
            seq: 0,
            id: format!("legacy:{dir_name}"),
            timestamp: chrono::Utc::now(),
            project: "global".to_string(),
            kind: sage_core::EntryKind::Record,
            title: title.to_string(),
            content: String::new(),
            tags: Vec::new(),
            metadata: Default::default(),
        })
        .unwrap();
}

#[test]
fn add_then_timeline_shows_normalized_tags() {
    let home = tempdir().unwrap();

    sage(home.path())
        .args(["add", "Investigate flaky CI", "--tags", "Auth,backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("entry recorded"));

    sage(home.path())
        .arg("timeline")
        .assert()
        .success()
        .stdout(predicate::str::contains("Investigate flaky CI"))
        .stdout(predicate::str::contains("#auth #backend"));
}

#[test]
fn view_shows_full_entry_and_rejects_unknown_id() {
    let home = tempdir().unwrap();

    sage(home.path())
        .args(["add", "Use SQLite WAL mode", "--decision", "-m", "because locks"])
        .assert()
        .success();

    sage(home.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Use SQLite WAL mode"))
        .stdout(predicate::str::contains("Kind: decision"))
        .stdout(predicate::str::contains("because locks"));

    sage(home.path())
        .args(["view", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entry with id 99"));
}

#[test]
fn state_replays_decisions_and_context() {
    let home = tempdir().unwrap();

    sage(home.path())
        .args(["add", "Adopt rusqlite", "--decision"])
        .assert()
        .success();
    sage(home.path())
        .args(["add", "CI is flaky on linux"])
        .assert()
        .success();

    sage(home.path())
        .args(["state", "--at", "2099-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Decisions:"))
        .stdout(predicate::str::contains("- [1] Adopt rusqlite"))
        .stdout(predicate::str::contains("- [2] CI is flaky on linux"));
}

#[test]
fn tag_apply_and_list() {
    let home = tempdir().unwrap();

    sage(home.path()).args(["add", "Entry one"]).assert().success();

    sage(home.path())
        .args(["tag", "1", "Infra,ci"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tagged entry 1 with #ci #infra"));

    sage(home.path())
        .arg("tag")
        .assert()
        .success()
        .stdout(predicate::str::contains("- #infra (1)"))
        .stdout(predicate::str::contains("- #ci (1)"));

    sage(home.path())
        .args(["tag", "infra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry one"));
}

#[test]
fn hooks_install_status_uninstall_round_trip() {
    let home = tempdir().unwrap();
    let repo = tempdir().unwrap();
    init_repo(repo.path());

    let repo_arg = repo.path().to_str().unwrap();

    sage(home.path())
        .args(["hooks", "install", "--repo", repo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed:"));

    let hook_path = repo.path().join(".git/hooks/post-commit");
    let content = std::fs::read_to_string(&hook_path).unwrap();
    assert!(content.contains("# sage-hook: post-commit v1"));

    sage(home.path())
        .args(["hooks", "status", "--repo", repo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sage-managed: true"));

    sage(home.path())
        .args(["hooks", "uninstall", "--repo", repo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed Sage hook"));
    assert!(!hook_path.exists());
}

#[test]
fn hooks_uninstall_refuses_foreign_hook() {
    let home = tempdir().unwrap();
    let repo = tempdir().unwrap();
    init_repo(repo.path());

    let hooks_dir = repo.path().join(".git/hooks");
    std::fs::create_dir_all(&hooks_dir).unwrap();
    std::fs::write(hooks_dir.join("post-commit"), "echo legacy\n").unwrap();

    sage(home.path())
        .args(["hooks", "uninstall", "--repo", repo.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("not Sage-managed"));

    assert_eq!(
        std::fs::read_to_string(hooks_dir.join("post-commit")).unwrap(),
        "echo legacy\n"
    );
}

#[test]
fn legacy_stores_import_once_into_an_empty_global_db() {
    let home = tempdir().unwrap();

    // A legacy per-directory database is picked up on first open.
    seed_legacy_store(home.path(), "proj", "migrated from laptop");

    sage(home.path())
        .args(["timeline", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated from laptop"));

    // Once the global database is non-empty, further legacy databases
    // are left alone.
    seed_legacy_store(home.path(), "proj2", "appeared later");

    sage(home.path())
        .args(["timeline", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated from laptop"))
        .stdout(predicate::str::contains("appeared later").not());
}

#[test]
fn hook_post_commit_records_exactly_once() {
    let home = tempdir().unwrap();
    let repo = tempdir().unwrap();
    init_repo(repo.path());
    git(repo.path(), &["commit", "--allow-empty", "-m", "feat: wire up hooks"]);

    let repo_arg = repo.path().to_str().unwrap();

    for _ in 0..2 {
        sage(home.path())
            .args(["hook", "post-commit", "--repo", repo_arg])
            .assert()
            .success();
    }

    let output = sage(home.path())
        .args(["timeline", "--all"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.matches("feat: wire up hooks").count(),
        1,
        "expected exactly one recorded commit, got:\n{stdout}"
    );

    // The commit tags land in the config so `sage tag` lists them even
    // before any manual entry carries them.
    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"git\""));
    assert!(config.contains("\"commit\""));
}
