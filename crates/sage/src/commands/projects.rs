//! `sage projects` — optional shell-activated project scope.

use crate::global_store::open_global_store;
use crate::scope;
use anyhow::{Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use sage_core::{DEFAULT_PROJECT, normalize_project_name};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: Option<ProjectsCommand>,

    /// Shell type for activation output
    #[arg(long, value_enum, default_value_t = ShellKind::Sh, global = true)]
    pub shell: ShellKind,
}

#[derive(Subcommand)]
pub enum ProjectsCommand {
    /// List known projects
    List,
    /// Show current active project (if any)
    Current,
    /// Suggest a project name from a repository
    Detect {
        /// Path to repo (defaults to current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Activate a project scope in your shell
    Activate { name: String },
    /// Deactivate project scope in your shell
    Deactivate,
    /// Print the active project (for shell prompts)
    Prompt,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShellKind {
    Sh,
    Fish,
}

pub fn run(args: ProjectsArgs) -> Result<()> {
    match args.command {
        None | Some(ProjectsCommand::List) => list_projects(),
        Some(ProjectsCommand::Current) => {
            match scope::active_project() {
                Some(p) => println!("{p}"),
                None => println!("(none)"),
            }
            Ok(())
        }
        Some(ProjectsCommand::Detect { repo }) => {
            match suggested_project_from_repo(repo.as_deref()) {
                Some(p) => println!("{p}"),
                None => println!("(unknown)"),
            }
            Ok(())
        }
        Some(ProjectsCommand::Activate { name }) => {
            let name = normalize_project_name(&name);
            if name.is_empty() {
                bail!("invalid project name");
            }
            match args.shell {
                ShellKind::Fish => println!("set -gx {} \"{name}\"", scope::SCOPE_ENV_VAR),
                ShellKind::Sh => println!("export {}=\"{name}\"", scope::SCOPE_ENV_VAR),
            }
            Ok(())
        }
        Some(ProjectsCommand::Deactivate) => {
            match args.shell {
                ShellKind::Fish => println!("set -e {}", scope::SCOPE_ENV_VAR),
                ShellKind::Sh => println!("unset {}", scope::SCOPE_ENV_VAR),
            }
            Ok(())
        }
        Some(ProjectsCommand::Prompt) => {
            if let Some(p) = scope::active_project() {
                print!("sage:{p}");
            }
            Ok(())
        }
    }
}

fn list_projects() -> Result<()> {
    let store = open_global_store()?;
    let projects = store.list_projects()?;

    // Hide the implicit default.
    let mut known: Vec<String> = projects
        .into_iter()
        .map(|p| normalize_project_name(&p))
        .filter(|p| !p.is_empty() && p != DEFAULT_PROJECT)
        .collect();
    known.sort();
    known.dedup();

    let active = scope::active_project();

    println!("Active: {}\n", active.as_deref().unwrap_or("(none)"));
    println!("Known projects:");
    if known.is_empty() {
        println!("(none yet)");
    } else {
        for project in &known {
            let mark = if active.as_deref() == Some(project) { "*" } else { " " };
            println!("{mark} {project}");
        }
    }

    println!();
    println!("Activate (bash/zsh): eval \"$(sage projects activate <name>)\"");
    println!("Activate (fish):     sage projects activate <name> --shell fish | source");
    println!("Deactivate:          eval \"$(sage projects deactivate)\"");
    Ok(())
}

/// Suggest a project name: the repo root's basename, falling back to the
/// given path's basename.
fn suggested_project_from_repo(repo: Option<&Path>) -> Option<String> {
    if let Ok(root) = sage_git::repo_root(repo) {
        let name = normalize_project_name(&root.file_name()?.to_string_lossy());
        if !name.is_empty() {
            return Some(name);
        }
    }

    let fallback = repo.map(Path::to_path_buf).or_else(|| std::env::current_dir().ok())?;
    let name = normalize_project_name(&fallback.file_name()?.to_string_lossy());
    if name.is_empty() { None } else { Some(name) }
}
