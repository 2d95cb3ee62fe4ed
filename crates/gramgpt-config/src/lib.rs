//! GramGPT configuration system.
//!
//! Provides TOML-based configuration with full validation, plus the
//! persisted theme preference. All config sections use sensible defaults
//! so partial configs work out of the box.

pub mod preferences;
pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use preferences::{Preferences, Theme};
pub use schema::GramConfig;

use std::path::Path;

use gramgpt_common::ConfigError;

/// Load config from the platform default path, creating a default file if
/// none exists, and validate the result.
pub fn load_config() -> Result<GramConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<GramConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\nlanguage = \"xx-YY\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
