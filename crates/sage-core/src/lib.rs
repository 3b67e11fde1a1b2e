//! Core types shared by every Sage component.
//!
//! This crate defines the immutable event record, tag normalization, and
//! project-name rules. It has no storage or process dependencies so the
//! engine and the hook manager stay unit-testable.

pub mod event;
pub mod project;
pub mod tags;

pub use event::{EntryKind, Event};
pub use project::{DEFAULT_PROJECT, normalize_project_name, resolve_project_filter};
pub use tags::{event_has_any_tag, normalize_tags};
