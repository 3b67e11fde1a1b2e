//! SQLite-backed event log.

use crate::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use sage_core::{Event, normalize_tags};
use std::path::Path;
use std::time::Duration;

/// Indexes are applied both after a fresh migration and on every open of
/// an already-migrated database.
const INDEX_SCHEMA: &str = "
CREATE INDEX IF NOT EXISTS idx_events_time
ON events(timestamp);
CREATE UNIQUE INDEX IF NOT EXISTS idx_events_id
ON events(id);
CREATE INDEX IF NOT EXISTS idx_events_project
ON events(project);
CREATE INDEX IF NOT EXISTS idx_events_project_seq
ON events(project, seq);
";

/// Append-only event store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path` and run migration if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut conn = Connection::open(path)?;

        // Bounded retry window for the file lock. A hook invocation can
        // race a manual command on the same database; waiting briefly
        // beats failing with "database is locked".
        conn.busy_timeout(Duration::from_millis(5000))?;

        migrate(&mut conn)?;
        Ok(Self { conn })
    }

    /// Insert a new event. The sequence number is assigned here, exactly
    /// once, by the autoincrement primary key. Tags are normalized before
    /// persistence. A colliding id yields [`StoreError::DuplicateId`].
    pub fn append(&self, event: &Event) -> Result<(), StoreError> {
        let mut event = event.clone();
        event.tags = normalize_tags(&event.tags);

        let data = serde_json::to_string(&event)?;
        let result = self.conn.execute(
            "INSERT INTO events (id, timestamp, type, project, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.id,
                format_timestamp(&event.timestamp),
                event.kind.as_str(),
                event.project,
                data,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateId(event.id)),
            Err(err) => Err(err.into()),
        }
    }

    /// All events, ordered by sequence ascending.
    pub fn list(&self) -> Result<Vec<Event>, StoreError> {
        self.query_events("SELECT seq, data FROM events ORDER BY seq ASC", params![])
    }

    /// Events for one project, ordered by sequence ascending.
    pub fn list_by_project(&self, project: &str) -> Result<Vec<Event>, StoreError> {
        self.query_events(
            "SELECT seq, data FROM events WHERE project = ?1 ORDER BY seq ASC",
            params![project],
        )
    }

    /// Events whose timestamp is at or before `until`, ordered by sequence.
    ///
    /// Timestamp order and sequence order can diverge: imported or
    /// backfilled events may carry historical timestamps appended out of
    /// chronological order. "State as of time t" is therefore not the same
    /// as "the first N appended events". That divergence is deliberate.
    pub fn list_until(&self, until: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        self.query_events(
            "SELECT seq, data FROM events WHERE timestamp <= ?1 ORDER BY seq ASC",
            params![format_timestamp(&until)],
        )
    }

    /// [`Store::list_until`] scoped to one project.
    pub fn list_until_by_project(
        &self,
        until: DateTime<Utc>,
        project: &str,
    ) -> Result<Vec<Event>, StoreError> {
        self.query_events(
            "SELECT seq, data FROM events
             WHERE timestamp <= ?1 AND project = ?2 ORDER BY seq ASC",
            params![format_timestamp(&until), project],
        )
    }

    /// Most recently appended event, if any.
    pub fn latest(&self) -> Result<Option<Event>, StoreError> {
        self.query_one(
            "SELECT seq, data FROM events ORDER BY seq DESC LIMIT 1",
            params![],
        )
    }

    /// Most recently appended event for one project, if any.
    pub fn latest_by_project(&self, project: &str) -> Result<Option<Event>, StoreError> {
        self.query_one(
            "SELECT seq, data FROM events WHERE project = ?1 ORDER BY seq DESC LIMIT 1",
            params![project],
        )
    }

    /// Exact sequence lookup.
    pub fn get_by_seq(&self, seq: i64) -> Result<Option<Event>, StoreError> {
        self.query_one(
            "SELECT seq, data FROM events WHERE seq = ?1 LIMIT 1",
            params![seq],
        )
    }

    /// Replace the tags of a stored event in place. Everything else about
    /// the record is immutable.
    pub fn update_tags_by_seq(&self, seq: i64, tags: &[String]) -> Result<(), StoreError> {
        let Some(mut event) = self.get_by_seq(seq)? else {
            return Err(StoreError::NotFound(seq));
        };

        event.tags = normalize_tags(tags);
        let data = serde_json::to_string(&event)?;
        self.conn.execute(
            "UPDATE events SET data = ?1 WHERE seq = ?2",
            params![data, seq],
        )?;
        Ok(())
    }

    /// Total number of stored events.
    pub fn count(&self) -> Result<i64, StoreError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Distinct non-empty project labels, sorted.
    pub fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT project FROM events
             WHERE project IS NOT NULL AND project != '' ORDER BY project ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }
        Ok(projects)
    }

    /// Append a batch from a foreign store. Events are sorted by
    /// (timestamp, id) first so sequence assignment is deterministic;
    /// duplicate ids are skipped. Returns the number actually inserted.
    ///
    /// Callers guard this with a `count() == 0` check, which makes
    /// repeated invocations safe no-ops.
    pub fn import_events(&self, mut events: Vec<Event>) -> Result<usize, StoreError> {
        if events.is_empty() {
            return Ok(0);
        }

        events.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut inserted = 0;
        for event in &events {
            match self.append(event) {
                Ok(()) => inserted += 1,
                Err(err) if err.is_duplicate() => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(inserted)
    }

    fn query_events(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (seq, raw) = row?;
            events.push(decode_event(seq, &raw)?);
        }
        Ok(events)
    }

    fn query_one(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<Event>, StoreError> {
        let row = self
            .conn
            .query_row(sql, params, |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .optional()?;

        match row {
            Some((seq, raw)) => Ok(Some(decode_event(seq, &raw)?)),
            None => Ok(None),
        }
    }
}

/// Read events from a database file without migrating it. Used for
/// importing legacy per-directory stores; sequence numbers are not
/// meaningful for the returned events.
pub fn read_events_from_db(path: impl AsRef<Path>) -> Result<Vec<Event>, StoreError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut stmt = conn.prepare("SELECT data FROM events ORDER BY timestamp ASC, id ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut events = Vec::new();
    for row in rows {
        events.push(decode_event(0, &row?)?);
    }
    Ok(events)
}

/// Timestamps are persisted as RFC 3339 UTC at second precision, so that
/// lexicographic comparison in SQL matches chronological order.
fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_event(seq: i64, raw: &str) -> Result<Event, StoreError> {
    let mut event: Event = serde_json::from_str(raw)?;
    event.seq = seq;
    Ok(event)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Migrate a v1 database (no `seq` column) to v2.
///
/// Runs entirely inside one transaction: create the v2 table, copy every
/// row ordered by (timestamp, id) so sequence becomes a deterministic
/// function of chronological order, swap tables, rebuild indexes. Any
/// failure rolls the whole thing back; the original table is never
/// dropped before the copy succeeds. If `seq` already exists, only index
/// creation runs.
fn migrate(conn: &mut Connection) -> Result<(), StoreError> {
    if has_column(conn, "events", "seq")? {
        conn.execute_batch(INDEX_SCHEMA)?;
        return Ok(());
    }

    let tx = conn.transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS events_v2 (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            timestamp TEXT NOT NULL,
            type TEXT NOT NULL,
            project TEXT NOT NULL,
            data TEXT NOT NULL
        );",
    )?;

    // Copy from v1 if it exists; on a brand-new database events_v2 simply
    // becomes the empty table.
    if table_exists(&tx, "events")? {
        tx.execute_batch(
            "INSERT INTO events_v2 (id, timestamp, type, project, data)
             SELECT id, timestamp, type, project, data
             FROM events
             ORDER BY timestamp ASC, id ASC;",
        )?;
    }

    tx.execute_batch("DROP TABLE IF EXISTS events;")?;
    tx.execute_batch("ALTER TABLE events_v2 RENAME TO events;")?;
    tx.execute_batch(INDEX_SCHEMA)?;

    tx.commit()?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1 LIMIT 1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
