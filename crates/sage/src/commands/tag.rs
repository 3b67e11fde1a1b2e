//! `sage tag` — list tags, show tagged entries, or tag an entry.

use crate::commands::print_event_line;
use crate::config;
use crate::global_store::open_global_store;
use anyhow::{Result, bail};
use clap::Args;
use sage_core::{event_has_any_tag, normalize_tags};
use sage_store::Store;
use std::collections::HashMap;

#[derive(Args)]
pub struct TagArgs {
    /// `sage tag` lists tags; `sage tag <name>` shows tagged entries;
    /// `sage tag <id> <name,...>` applies tags to an entry
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

pub fn run(args: TagArgs) -> Result<()> {
    let store = open_global_store()?;

    match args.args.as_slice() {
        [] => list_tags(&store),
        [name] => {
            let name = name.trim();
            if name.is_empty() {
                return list_tags(&store);
            }
            if name.chars().all(|c| c.is_ascii_digit()) {
                bail!("to tag an entry, use: sage tag <id> <name>");
            }
            show_tag(&store, name.trim_start_matches('#'))
        }
        [id, name] => {
            let id: i64 = id
                .trim()
                .parse()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| anyhow::anyhow!("invalid entry id: {id}"))?;
            apply_tags(&store, id, name)
        }
        _ => bail!("usage: sage tag | sage tag <name> | sage tag <id> <name>"),
    }
}

fn list_tags(store: &Store) -> Result<()> {
    let events = store.list()?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for event in &events {
        for tag in normalize_tags(&event.tags) {
            *counts.entry(tag).or_default() += 1;
        }
    }

    // Configured ordering first, then any tags found only in entries.
    let mut configured = config::configured_tags()?;
    for tag in counts.keys() {
        if !configured.iter().any(|t| t == tag) {
            configured.push(tag.clone());
        }
    }
    let configured = normalize_tags(&configured);

    // Persist the union so tags stay discoverable.
    config::set_configured_tags(configured.clone())?;

    println!("Tags:");
    if configured.is_empty() {
        println!("(none)");
    } else {
        for tag in &configured {
            println!("- #{} ({})", tag, counts.get(tag).copied().unwrap_or(0));
        }
    }

    println!();
    println!("To apply: sage tag <id> <name>  (comma-separated supported)");
    println!("To view:  sage tag <name>");
    Ok(())
}

fn show_tag(store: &Store, name: &str) -> Result<()> {
    let tags = normalize_tags(&[name]);
    let Some(want) = tags.first() else {
        bail!("invalid tag");
    };

    let events = store.list()?;

    println!("Entries tagged '{want}':");
    let mut found = false;
    for event in &events {
        if event_has_any_tag(event, std::slice::from_ref(want)) {
            print_event_line(event);
            found = true;
        }
    }
    if !found {
        println!("(none)");
    }
    Ok(())
}

fn apply_tags(store: &Store, id: i64, raw_name: &str) -> Result<()> {
    let new_tags = normalize_tags(&[raw_name]);
    if new_tags.is_empty() {
        bail!("invalid tag");
    }

    let Some(event) = store.get_by_seq(id)? else {
        bail!("no entry with id {id}");
    };

    // Merge, preserving existing order.
    let mut merged = normalize_tags(&event.tags);
    for tag in &new_tags {
        if !merged.iter().any(|t| t == tag) {
            merged.push(tag.clone());
        }
    }

    config::ensure_tags_configured(&merged)?;
    store.update_tags_by_seq(id, &merged)?;

    let mut applied = new_tags;
    applied.sort();
    let formatted: Vec<String> = applied.into_iter().map(|t| format!("#{t}")).collect();
    println!("Tagged entry {id} with {}", formatted.join(" "));
    Ok(())
}
