//! Store error taxonomy.

use thiserror::Error;

/// Errors surfaced by the event log.
///
/// `DuplicateId` is an expected idempotence signal, not a failure: callers
/// that re-submit an already-recorded event treat it as success.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("event serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("event id already recorded: {0}")]
    DuplicateId(String),

    #[error("no entry with id {0}")]
    NotFound(i64),
}

impl StoreError {
    /// True for the expected duplicate-id collision on append.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateId(_))
    }
}
