use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GramError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("model.temperature = 3 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: model.temperature = 3 is out of range"
        );
    }

    #[test]
    fn gram_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GramError = config_err.into();
        assert!(matches!(err, GramError::Config(_)));
        assert_eq!(err.to_string(), "config parse error: bad toml");
    }

    #[test]
    fn unknown_language_display() {
        let err = GramError::UnknownLanguage("xx-YY".into());
        assert_eq!(err.to_string(), "unknown language: xx-YY");
    }
}
