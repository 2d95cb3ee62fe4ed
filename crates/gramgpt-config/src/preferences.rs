//! The one persisted user preference: display theme.
//!
//! Stored in `preferences.toml` next to `config.toml`. Everything else a
//! user does (history, suggestions, language) lives in memory only.

use std::path::{Path, PathBuf};

use gramgpt_common::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::toml_loader::config_dir;
use crate::toml_writer::write_toml_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
}

pub fn default_preferences_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("preferences.toml"))
}

/// Read preferences from `path`. A missing or unreadable file yields the
/// defaults; preferences are never worth failing startup over.
pub fn load_preferences_from(path: &Path) -> Preferences {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Preferences::default(),
    };
    match toml::from_str(&content) {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!("ignoring malformed preferences at {}: {e}", path.display());
            Preferences::default()
        }
    }
}

pub fn save_preferences_to(prefs: &Preferences, path: &Path) -> Result<(), ConfigError> {
    write_toml_atomic(prefs, path)?;
    info!(theme = prefs.theme.as_str(), "preferences saved");
    Ok(())
}
