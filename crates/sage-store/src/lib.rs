//! Persistent append-only event log backed by SQLite.
//!
//! One file per installation, one `events` table. The store assigns a
//! monotonic sequence number at append time, migrates pre-sequence
//! databases transactionally, and absorbs duplicate event ids so that
//! producers can safely re-submit.

mod error;
mod store;

pub use error::StoreError;
pub use store::{Store, read_events_from_db};
