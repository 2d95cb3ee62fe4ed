//! Full configuration validation.
//!
//! Each section has its own check function; this orchestrator calls them
//! all and collects errors into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::GramConfig;
use gramgpt_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GramConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_model(&mut errors, config);
    sections::validate_chat(&mut errors, config);
    sections::validate_proxy(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
