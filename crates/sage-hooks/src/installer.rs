//! Install, inspect, and uninstall the managed hook script.

use crate::script::{is_managed, parse_legacy_hook_path, render_hook_script};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Options shared by install and uninstall.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Overwrite a foreign hook instead of backing it up.
    pub force: bool,
    /// Compute and report the decision without touching the filesystem.
    pub dry_run: bool,
    /// Generated script blocks the commit on the automation call instead
    /// of backgrounding it. Affects latency only, never correctness.
    pub sync: bool,
}

/// Live filesystem state of one hook path. Recomputed on every call;
/// nothing here is persisted.
#[derive(Debug, Clone)]
pub struct HookInspection {
    pub hook_path: Utf8PathBuf,
    pub exists: bool,
    pub managed: bool,
    pub legacy_hook_path: Option<Utf8PathBuf>,
}

/// What an install did (or, under dry-run, would do).
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub hook_path: Utf8PathBuf,
    pub backed_up: bool,
    pub backup_path: Option<Utf8PathBuf>,
    pub installed: bool,
    pub updated: bool,
    pub was_managed: bool,
    pub legacy_chained: bool,
}

/// Uninstall outcome. Refusal to touch a foreign hook is a reported
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    NotInstalled,
    RefusedUnmanaged,
    RestoredLegacy(Utf8PathBuf),
    Removed,
}

impl UninstallOutcome {
    pub fn describe(&self) -> String {
        match self {
            Self::NotInstalled => "not installed".to_string(),
            Self::RefusedUnmanaged => {
                "existing hook is not Sage-managed; refusing to modify".to_string()
            }
            Self::RestoredLegacy(path) => format!("restored legacy hook from {path}"),
            Self::Removed => "removed Sage hook".to_string(),
        }
    }
}

/// Read and classify the hook at `<hooks_dir>/<hook_name>`.
pub fn inspect_hook(hooks_dir: &Utf8Path, hook_name: &str) -> Result<HookInspection> {
    let hook_path = hooks_dir.join(hook_name);

    let content = match fs::read_to_string(&hook_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HookInspection {
                hook_path,
                exists: false,
                managed: false,
                legacy_hook_path: None,
            });
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read hook: {hook_path}"));
        }
    };

    Ok(HookInspection {
        managed: is_managed(&content, hook_name),
        legacy_hook_path: parse_legacy_hook_path(&content).map(Utf8PathBuf::from),
        hook_path,
        exists: true,
    })
}

/// Install (or re-install) the managed hook script.
///
/// State transitions:
/// - absent: write a fresh script, no chaining.
/// - foreign, no force: relocate the existing file to a backup and chain it.
/// - foreign, force: delete the existing file, no chaining.
/// - managed: keep the recorded chain target and rewrite only the body.
pub fn install_hook(
    hooks_dir: &Utf8Path,
    hook_name: &str,
    opts: InstallOptions,
) -> Result<InstallReport> {
    if hooks_dir.as_str().trim().is_empty() {
        bail!("hooks directory is required");
    }
    if hook_name.trim().is_empty() {
        bail!("hook name is required");
    }

    let inspected = inspect_hook(hooks_dir, hook_name)?;
    let hook_path = inspected.hook_path.clone();

    let mut report = InstallReport {
        hook_path: hook_path.clone(),
        backed_up: false,
        backup_path: None,
        installed: false,
        updated: false,
        was_managed: inspected.managed,
        legacy_chained: false,
    };

    let mut legacy_path: Option<Utf8PathBuf> = None;
    if inspected.exists && !inspected.managed {
        if opts.force {
            if !opts.dry_run {
                let _ = fs::remove_file(&hook_path);
            }
        } else {
            let backup_path = backup_hook_file(&hook_path, hook_name, opts.dry_run)?;
            legacy_path = Some(backup_path.clone());
            report.backed_up = true;
            report.backup_path = Some(backup_path);
            report.legacy_chained = true;
        }
    } else if inspected.managed {
        // Re-install: never re-backup, keep the existing chain target.
        legacy_path = inspected.legacy_hook_path.clone();
        report.legacy_chained = legacy_path.is_some();
    }

    let script = render_hook_script(hook_name, legacy_path.as_ref().map(|p| p.as_str()), opts.sync);

    if !opts.dry_run {
        fs::create_dir_all(hooks_dir)
            .with_context(|| format!("failed to create hooks dir: {hooks_dir}"))?;

        let had_previous = fs::metadata(&hook_path).map(|m| m.len() > 0).unwrap_or(false);
        fs::write(&hook_path, script)
            .with_context(|| format!("failed to write hook: {hook_path}"))?;
        make_executable(&hook_path)?;

        if had_previous {
            report.updated = true;
        } else {
            report.installed = true;
        }
    }

    Ok(report)
}

/// Remove the managed hook, restoring a chained legacy script when one is
/// still on disk.
pub fn uninstall_hook(
    hooks_dir: &Utf8Path,
    hook_name: &str,
    opts: InstallOptions,
) -> Result<UninstallOutcome> {
    let inspected = inspect_hook(hooks_dir, hook_name)?;

    if !inspected.exists {
        return Ok(UninstallOutcome::NotInstalled);
    }
    if !inspected.managed {
        return Ok(UninstallOutcome::RefusedUnmanaged);
    }

    if let Some(legacy) = &inspected.legacy_hook_path {
        if legacy.exists() {
            if !opts.dry_run {
                fs::rename(legacy, &inspected.hook_path).with_context(|| {
                    format!("failed to restore legacy hook from {legacy}")
                })?;
            }
            return Ok(UninstallOutcome::RestoredLegacy(legacy.clone()));
        }
    }

    if !opts.dry_run {
        fs::remove_file(&inspected.hook_path)
            .with_context(|| format!("failed to remove hook: {}", inspected.hook_path))?;
    }
    Ok(UninstallOutcome::Removed)
}

/// Relocate a foreign hook to `<name>.sage.legacy`, suffixing a unix
/// timestamp when that name is already taken.
fn backup_hook_file(hook_path: &Utf8Path, hook_name: &str, dry_run: bool) -> Result<Utf8PathBuf> {
    let dir = hook_path.parent().unwrap_or(Utf8Path::new("."));
    let base = format!("{hook_name}.sage.legacy");

    let mut candidate = dir.join(&base);
    if candidate.exists() {
        candidate = dir.join(format!("{base}.{}", chrono::Utc::now().timestamp()));
    }

    if !dry_run {
        fs::rename(hook_path, &candidate)
            .with_context(|| format!("failed to back up hook to {candidate}"))?;
    }
    Ok(candidate)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to chmod hook: {path}"))
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn hooks_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("hooks")).unwrap()
    }

    #[test]
    fn test_fresh_install() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);

        let report = install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert!(report.installed);
        assert!(!report.updated);
        assert!(!report.backed_up);
        assert!(!report.legacy_chained);

        let inspected = inspect_hook(&hooks, "post-commit").unwrap();
        assert!(inspected.exists);
        assert!(inspected.managed);
        assert_eq!(inspected.legacy_hook_path, None);
    }

    #[test]
    fn test_foreign_hook_is_backed_up_and_chained() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();

        let report = install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert!(report.backed_up);
        assert!(report.legacy_chained);
        let backup = report.backup_path.unwrap();
        assert_eq!(backup, hooks.join("post-commit.sage.legacy"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "echo legacy\n");

        let inspected = inspect_hook(&hooks, "post-commit").unwrap();
        assert!(inspected.managed);
        assert_eq!(inspected.legacy_hook_path, Some(backup));
    }

    #[test]
    fn test_reinstall_preserves_chain_without_second_backup() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();

        let first = install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        let backup = first.backup_path.unwrap();

        // Re-install toggling sync mode.
        let second = install_hook(
            &hooks,
            "post-commit",
            InstallOptions { sync: true, ..Default::default() },
        )
        .unwrap();
        assert!(second.was_managed);
        assert!(!second.backed_up);
        assert!(second.legacy_chained);
        assert!(second.updated);

        let inspected = inspect_hook(&hooks, "post-commit").unwrap();
        assert_eq!(inspected.legacy_hook_path, Some(backup));

        // Exactly one backup file exists.
        let backups: Vec<_> = fs::read_dir(&hooks)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("sage.legacy"))
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_force_replaces_without_chaining() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();

        let report = install_hook(
            &hooks,
            "post-commit",
            InstallOptions { force: true, ..Default::default() },
        )
        .unwrap();
        assert!(!report.backed_up);
        assert!(!report.legacy_chained);

        let inspected = inspect_hook(&hooks, "post-commit").unwrap();
        assert!(inspected.managed);
        assert_eq!(inspected.legacy_hook_path, None);
        assert!(!hooks.join("post-commit.sage.legacy").exists());
    }

    #[test]
    fn test_dry_run_reports_without_touching_files() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();

        let report = install_hook(
            &hooks,
            "post-commit",
            InstallOptions { dry_run: true, ..Default::default() },
        )
        .unwrap();
        assert!(report.backed_up);
        assert!(!report.installed);
        assert!(!report.updated);

        // The foreign hook is still in place, unmodified.
        assert_eq!(
            fs::read_to_string(hooks.join("post-commit")).unwrap(),
            "echo legacy\n"
        );
        assert!(!hooks.join("post-commit.sage.legacy").exists());
    }

    #[test]
    fn test_backup_collision_gets_timestamp_suffix() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();
        fs::write(hooks.join("post-commit.sage.legacy"), "older backup\n").unwrap();

        let report = install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        let backup = report.backup_path.unwrap();
        assert_ne!(backup, hooks.join("post-commit.sage.legacy"));
        assert!(backup.as_str().contains("post-commit.sage.legacy."));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "echo legacy\n");
    }

    #[test]
    fn test_uninstall_refuses_foreign_hook() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo mine\n").unwrap();

        let outcome =
            uninstall_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert_eq!(outcome, UninstallOutcome::RefusedUnmanaged);
        assert_eq!(
            fs::read_to_string(hooks.join("post-commit")).unwrap(),
            "echo mine\n"
        );
    }

    #[test]
    fn test_uninstall_restores_legacy_content() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("post-commit"), "echo legacy\n").unwrap();

        install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        let outcome =
            uninstall_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert!(matches!(outcome, UninstallOutcome::RestoredLegacy(_)));

        assert_eq!(
            fs::read_to_string(hooks.join("post-commit")).unwrap(),
            "echo legacy\n"
        );
        assert!(!hooks.join("post-commit.sage.legacy").exists());
    }

    #[test]
    fn test_uninstall_removes_unchained_hook() {
        let tmp = tempdir().unwrap();
        let hooks = hooks_dir(&tmp);

        install_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        let outcome =
            uninstall_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert_eq!(outcome, UninstallOutcome::Removed);
        assert!(!hooks.join("post-commit").exists());

        let outcome =
            uninstall_hook(&hooks, "post-commit", InstallOptions::default()).unwrap();
        assert_eq!(outcome, UninstallOutcome::NotInstalled);
    }
}
