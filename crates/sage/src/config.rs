//! User config: tag-name bookkeeping.
//!
//! Tags applied to entries are also recorded here so `sage tag` can list
//! them even before any entry carries them.

use crate::paths::config_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

pub fn load_config() -> Result<UserConfig> {
    let Some(path) = config_path() else {
        return Ok(UserConfig::default());
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(UserConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config: {}", path.display()));
        }
    };

    serde_json::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
}

pub fn save_config(config: &UserConfig) -> Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };

    let raw = serde_json::to_string_pretty(config)?;
    fs::write(&path, raw).with_context(|| format!("failed to write config: {}", path.display()))
}

pub fn configured_tags() -> Result<Vec<String>> {
    Ok(load_config()?.tags)
}

pub fn set_configured_tags(tags: Vec<String>) -> Result<()> {
    let mut config = load_config()?;
    config.tags = tags;
    save_config(&config)
}

/// Union new tags into the configured set, preserving existing order.
pub fn ensure_tags_configured(tags: &[String]) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }

    let mut current = configured_tags()?;
    let mut changed = false;
    for tag in tags {
        if tag.is_empty() || current.iter().any(|t| t == tag) {
            continue;
        }
        current.push(tag.clone());
        changed = true;
    }

    if changed {
        set_configured_tags(current)?;
    }
    Ok(())
}
