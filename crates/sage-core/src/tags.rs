//! Tag normalization and matching.

use crate::event::Event;
use std::collections::HashSet;

/// Normalize raw tag inputs: split on commas, trim, lowercase, drop
/// empties, and dedupe while keeping first-seen order.
pub fn normalize_tags<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for input in inputs {
        for part in input.as_ref().split(',') {
            let tag = part.trim().to_lowercase();
            if tag.is_empty() || !seen.insert(tag.clone()) {
                continue;
            }
            tags.push(tag);
        }
    }

    tags
}

/// True when the event carries at least one of the wanted tags.
/// Wanted tags are expected to already be normalized.
pub fn event_has_any_tag(event: &Event, want: &[String]) -> bool {
    if want.is_empty() {
        return true;
    }
    if event.tags.is_empty() {
        return false;
    }

    let set: HashSet<String> = event
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    want.iter().any(|w| set.contains(w))
}
