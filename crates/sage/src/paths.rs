//! Sage home directory layout.
//!
//! Everything lives under one directory: the global database and the
//! user config file.

use std::fs;
use std::path::PathBuf;

/// Sage home directory.
///
/// Priority:
/// 1. SAGE_HOME environment variable (if set)
/// 2. ~/.sage
pub fn sage_dir() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("SAGE_HOME") {
        if !custom.trim().is_empty() {
            return Some(PathBuf::from(custom));
        }
    }
    dirs::home_dir().map(|home| home.join(".sage"))
}

/// Path of the global database, creating the home directory if needed.
pub fn global_db_path() -> Option<PathBuf> {
    let dir = sage_dir()?;
    let _ = fs::create_dir_all(&dir);
    Some(dir.join("sage.db"))
}

/// Path of the user config file, creating the home directory if needed.
pub fn config_path() -> Option<PathBuf> {
    let dir = sage_dir()?;
    let _ = fs::create_dir_all(&dir);
    Some(dir.join("config.json"))
}
