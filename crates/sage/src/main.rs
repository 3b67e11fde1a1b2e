//! `sage` — a local journal for developer decisions and git commits.

mod commands;
mod config;
mod global_store;
mod paths;
mod scope;
mod timeparse;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sage", version, about = "Record decisions, context, and git commits in one local log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new entry (record/decision)
    Add(commands::add::AddArgs),
    /// Show chronological history of entries
    Timeline(commands::timeline::TimelineArgs),
    /// View a past entry by numeric id
    View(commands::view::ViewArgs),
    /// Reconstruct state at a point in time
    State(commands::state::StateArgs),
    /// List tags, or tag entries
    Tag(commands::tag::TagArgs),
    /// Manage project scope (optional)
    Projects(commands::projects::ProjectsArgs),
    /// Install and manage git hooks
    Hooks(commands::hooks::HooksArgs),
    /// Internal hook entrypoints
    #[command(hide = true)]
    Hook(commands::hook::HookArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add(args) => commands::add::run(args),
        Commands::Timeline(args) => commands::timeline::run(args),
        Commands::View(args) => commands::view::run(args),
        Commands::State(args) => commands::state::run(args),
        Commands::Tag(args) => commands::tag::run(args),
        Commands::Projects(args) => commands::projects::run(args),
        Commands::Hooks(args) => commands::hooks::run(args),
        Commands::Hook(args) => commands::hook::run(args),
    }
}
