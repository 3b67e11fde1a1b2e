//! `sage hooks` — install, inspect, and uninstall git hooks.

use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use clap::{Args, Subcommand};
use sage_hooks::{InstallOptions, inspect_hook, install_hook, uninstall_hook};
use std::path::PathBuf;

#[derive(Args)]
pub struct HooksArgs {
    #[command(subcommand)]
    pub command: HooksCommand,

    /// Path to repo (defaults to current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Hook name (currently only post-commit is supported)
    #[arg(long, global = true, default_value = "post-commit")]
    pub hook: String,

    /// Overwrite an existing hook instead of backing it up
    #[arg(long, global = true)]
    pub force: bool,

    /// Print what would change without modifying files
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum HooksCommand {
    /// Install the Sage git hook
    Install {
        /// Run Sage synchronously on commit (default: background)
        #[arg(long)]
        sync: bool,
    },
    /// Show hook installation status
    Status,
    /// Uninstall the Sage git hook
    Uninstall,
}

pub fn run(args: HooksArgs) -> Result<()> {
    let hook = validate_hook_name(&args.hook)?;
    let repo = args.repo.as_deref();

    let (hooks_dir, core_hooks_path) = sage_git::hooks_dir(repo)?;
    let hooks_dir = utf8_dir(hooks_dir)?;

    match args.command {
        HooksCommand::Install { sync } => {
            let report = install_hook(
                &hooks_dir,
                &hook,
                InstallOptions { force: args.force, dry_run: args.dry_run, sync },
            )?;

            println!("Repo hooks dir: {hooks_dir}");
            warn_core_hooks_path(core_hooks_path.as_deref());
            println!("Installed: {}", report.hook_path);
            if let Some(backup) = &report.backup_path {
                println!("Backed up existing hook to: {backup}");
            }
            if args.dry_run {
                println!("(dry-run) no files were modified");
            }
        }
        HooksCommand::Status => {
            let root = sage_git::repo_root(repo)?;
            let inspected = inspect_hook(&hooks_dir, &hook)?;

            println!("Repo: {}", root.display());
            println!("Hooks dir: {hooks_dir}");
            warn_core_hooks_path(core_hooks_path.as_deref());

            if !inspected.exists {
                println!("{hook}: not installed");
                return Ok(());
            }
            println!("{hook}: installed at {}", inspected.hook_path);
            println!("Sage-managed: {}", inspected.managed);
            if let Some(legacy) = &inspected.legacy_hook_path {
                println!("Chained legacy hook: {legacy}");
            }
        }
        HooksCommand::Uninstall => {
            let outcome = uninstall_hook(
                &hooks_dir,
                &hook,
                InstallOptions { force: args.force, dry_run: args.dry_run, sync: false },
            )?;

            println!("Repo hooks dir: {hooks_dir}");
            warn_core_hooks_path(core_hooks_path.as_deref());
            println!("{hook}: {}", outcome.describe());
            if args.dry_run {
                println!("(dry-run) no files were modified");
            }
        }
    }

    Ok(())
}

fn validate_hook_name(name: &str) -> Result<String> {
    let name = name.trim();
    let name = if name.is_empty() { "post-commit" } else { name };
    if name != "post-commit" {
        bail!("unsupported hook: {name} (only post-commit is supported)");
    }
    Ok(name.to_string())
}

fn warn_core_hooks_path(core_hooks_path: Option<&str>) {
    if let Some(path) = core_hooks_path {
        println!("core.hooksPath: {path}");
        println!("Warning: core.hooksPath may be shared across repos.");
    }
}

fn utf8_dir(dir: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(dir)
        .map_err(|dir| anyhow::anyhow!("hooks dir is not valid UTF-8: {}", dir.display()))
}
