//! `sage add` — append a new record or decision.

use crate::{config, global_store::open_global_store, scope};
use anyhow::{Result, bail};
use chrono::Utc;
use clap::Args;
use sage_core::{EntryKind, Event, normalize_tags, project};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Args)]
pub struct AddArgs {
    /// Entry title
    pub title: String,

    /// Mark as decision instead of record
    #[arg(long, short = 'd')]
    pub decision: bool,

    /// Entry body
    #[arg(long, short = 'm', default_value = "")]
    pub content: String,

    /// Categorize entry (repeatable or comma-separated, e.g. --tags auth,backend)
    #[arg(long)]
    pub tags: Vec<String>,
}

pub fn run(args: AddArgs) -> Result<()> {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        bail!("title is required");
    }

    let tags = normalize_tags(&args.tags);
    let _ = config::ensure_tags_configured(&tags);

    let kind = if args.decision {
        EntryKind::Decision
    } else {
        EntryKind::Record
    };

    let event = Event {
        seq: 0,
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        project: project::project_for_new_entry(scope::active_project().as_deref()),
        kind,
        title,
        content: args.content.trim().to_string(),
        tags,
        metadata: BTreeMap::new(),
    };

    let store = open_global_store()?;
    store.append(&event)?;

    println!("entry recorded");
    Ok(())
}
