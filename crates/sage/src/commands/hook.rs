//! `sage hook` — internal entrypoints invoked by the installed scripts.
//!
//! Hooks must never block or fail the git operation they are attached
//! to, so every failure here is swallowed and the command always exits
//! successfully.

use crate::config;
use crate::global_store::open_global_store;
use anyhow::Result;
use clap::{Args, Subcommand};
use sage_hooks::record_post_commit;
use std::path::PathBuf;

#[derive(Args)]
pub struct HookArgs {
    #[command(subcommand)]
    pub command: HookCommand,
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// Record a git post-commit event
    PostCommit {
        /// Path to repo (defaults to current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
    },
}

pub fn run(args: HookArgs) -> Result<()> {
    match args.command {
        HookCommand::PostCommit { repo } => {
            // Keep the commit tags discoverable in `sage tag` even before
            // any manual entry carries them.
            let _ = config::ensure_tags_configured(&[
                "git".to_string(),
                "commit".to_string(),
            ]);
            if let Ok(store) = open_global_store() {
                record_post_commit(repo.as_deref(), &store);
            }
            Ok(())
        }
    }
}
