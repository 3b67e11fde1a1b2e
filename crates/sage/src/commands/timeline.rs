//! `sage timeline` — chronological summary of entries.

use crate::commands::print_event_line;
use crate::{global_store::open_global_store, scope};
use anyhow::Result;
use clap::Args;
use sage_core::{event_has_any_tag, normalize_tags, resolve_project_filter};

#[derive(Args)]
pub struct TimelineArgs {
    /// Filter by tags (repeatable or comma-separated)
    #[arg(long)]
    pub tags: Vec<String>,

    /// Filter by project (defaults to the active scope, if any)
    #[arg(long)]
    pub project: Option<String>,

    /// Ignore the active project scope
    #[arg(long)]
    pub all: bool,
}

pub fn run(args: TimelineArgs) -> Result<()> {
    let store = open_global_store()?;

    let active = scope::active_project();
    let filter = resolve_project_filter(args.project.as_deref(), args.all, active.as_deref());

    let events = match &filter {
        Some(project) => store.list_by_project(project)?,
        None => store.list()?,
    };

    let want = normalize_tags(&args.tags);
    for event in &events {
        if !event_has_any_tag(event, &want) {
            continue;
        }
        print_event_line(event);
    }

    Ok(())
}
