//! CLI subcommands.

pub mod add;
pub mod hook;
pub mod hooks;
pub mod projects;
pub mod state;
pub mod tag;
pub mod timeline;
pub mod view;

use chrono::Local;
use sage_core::Event;

/// One-line summary: timestamp, kind, title, sorted tags.
pub(crate) fn print_event_line(event: &Event) {
    let ts = event.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");

    let title = if event.title.trim().is_empty() {
        "(untitled)"
    } else {
        event.title.trim()
    };

    let mut tag_suffix = String::new();
    if !event.tags.is_empty() {
        let mut tags = event.tags.clone();
        tags.sort();
        let joined: Vec<String> = tags.into_iter().map(|t| format!("#{t}")).collect();
        tag_suffix = format!(" {}", joined.join(" "));
    }

    println!("[{ts}] {:<8} {title}{tag_suffix}", event.kind.as_str());
}
