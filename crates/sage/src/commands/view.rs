//! `sage view` — full contents of one entry.

use crate::global_store::open_global_store;
use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;
use sage_core::Event;

#[derive(Args)]
pub struct ViewArgs {
    /// Numeric entry id (shown in `sage timeline`)
    pub id: i64,
}

pub fn run(args: ViewArgs) -> Result<()> {
    if args.id <= 0 {
        bail!("invalid entry id: {}", args.id);
    }

    let store = open_global_store()?;
    let Some(event) = store.get_by_seq(args.id)? else {
        bail!("no entry with id {}", args.id);
    };

    print_full_entry(&event);
    Ok(())
}

fn print_full_entry(event: &Event) {
    println!("ID: {}", event.seq);
    println!(
        "When: {}",
        event.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("Kind: {}", event.kind.as_str());

    let title = if event.title.trim().is_empty() {
        "(untitled)"
    } else {
        event.title.trim()
    };
    println!("Title: {title}");

    if event.tags.is_empty() {
        println!("Tags: (none)");
    } else {
        let mut tags = event.tags.clone();
        tags.sort();
        let joined: Vec<String> = tags.into_iter().map(|t| format!("#{t}")).collect();
        println!("Tags: {}", joined.join(" "));
    }

    println!();
    println!("{}", event.content.trim_end_matches('\n'));
}
