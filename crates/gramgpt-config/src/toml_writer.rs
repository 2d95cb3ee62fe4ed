//! Atomic TOML writes for files the app owns.
//!
//! Writes are atomic (write to `.tmp`, then rename) so a crash mid-write
//! never leaves a truncated file behind.

use std::path::Path;

use gramgpt_common::ConfigError;
use serde::Serialize;

/// Serialize `value` as pretty TOML and write it atomically to `path`,
/// creating parent directories as needed.
pub fn write_toml_atomic<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let toml_str = toml::to_string_pretty(value)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize TOML: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, &toml_str).map_err(|e| {
        ConfigError::ParseError(format!("failed to write {}: {e}", tmp_path.display()))
    })?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        // Rename can fail across filesystems or on Windows if the target is open.
        tracing::warn!("atomic rename failed ({}), falling back to direct write", e);
        std::fs::write(path, &toml_str).map_err(|e2| {
            ConfigError::ParseError(format!("failed to write {}: {e2}", path.display()))
        })?;
        let _ = std::fs::remove_file(&tmp_path);
    }

    tracing::debug!(path = %path.display(), "TOML saved to disk");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
