//! Global store access plus one-time legacy import.

use crate::paths::{global_db_path, sage_dir};
use anyhow::{Context, Result};
use sage_store::{Store, read_events_from_db};
use std::fs;

/// Open the single global store, importing any legacy per-directory
/// databases the first time.
pub fn open_global_store() -> Result<Store> {
    let path = global_db_path().context("could not determine Sage directory")?;
    let store = Store::open(&path)?;
    maybe_import_legacy_stores(&store)?;
    Ok(store)
}

/// Import legacy per-directory stores only if the global database is
/// empty. The emptiness guard makes repeated invocations safe no-ops.
fn maybe_import_legacy_stores(store: &Store) -> Result<()> {
    if store.count()? != 0 {
        return Ok(());
    }

    let Some(root) = sage_dir() else {
        return Ok(());
    };
    let Ok(entries) = fs::read_dir(&root) else {
        return Ok(());
    };

    let mut all = Vec::new();
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let db = dir.join("sage.db");
        if !db.exists() {
            continue;
        }
        // Skip unreadable legacy stores rather than failing the whole CLI.
        match read_events_from_db(&db) {
            Ok(events) => all.extend(events),
            Err(err) => {
                eprintln!("Warning: skipping legacy store {}: {}", db.display(), err);
            }
        }
    }

    if all.is_empty() {
        return Ok(());
    }

    let inserted = store.import_events(all)?;
    if inserted > 0 {
        eprintln!("Imported {inserted} legacy entries into global store.");
    }
    Ok(())
}
