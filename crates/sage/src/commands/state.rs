//! `sage state` — replay the log up to a point in time.

use crate::timeparse::parse_time;
use crate::{global_store::open_global_store, scope};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use sage_core::{EntryKind, Event, event_has_any_tag, normalize_tags, resolve_project_filter};

#[derive(Args)]
pub struct StateArgs {
    /// Timestamp (RFC 3339, YYYY-MM-DDTHH:MM, or YYYY-MM-DD)
    #[arg(long)]
    pub at: String,

    /// Filter replay by tags (repeatable or comma-separated)
    #[arg(long)]
    pub tags: Vec<String>,

    /// Filter by project (defaults to the active scope, if any)
    #[arg(long)]
    pub project: Option<String>,

    /// Ignore the active project scope
    #[arg(long)]
    pub all: bool,
}

pub fn run(args: StateArgs) -> Result<()> {
    let at = parse_time(&args.at)?;

    let store = open_global_store()?;

    let active = scope::active_project();
    let filter = resolve_project_filter(args.project.as_deref(), args.all, active.as_deref());

    let mut events = match &filter {
        Some(project) => store.list_until_by_project(at, project)?,
        None => store.list_until(at)?,
    };

    let want = normalize_tags(&args.tags);
    if !want.is_empty() {
        events.retain(|e| event_has_any_tag(e, &want));
    }

    replay_state(&events, at);
    Ok(())
}

fn replay_state(events: &[Event], at: DateTime<Utc>) {
    println!("State at {}\n", at.to_rfc3339_opts(SecondsFormat::Secs, true));

    println!("Decisions:");
    for event in events {
        if event.kind == EntryKind::Decision {
            println!("- [{}] {}", event.seq, title_or_placeholder(event));
        }
    }

    println!("\nContext:");
    for event in events {
        if event.kind == EntryKind::Record {
            println!("- [{}] {}", event.seq, title_or_placeholder(event));
        }
    }
}

fn title_or_placeholder(event: &Event) -> &str {
    let title = event.title.trim();
    if title.is_empty() { "(untitled)" } else { title }
}
