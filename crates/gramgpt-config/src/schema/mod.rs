//! Configuration schema types for GramGPT.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod logging;
mod model;
mod proxy;

pub use chat::*;
pub use logging::*;
pub use model::*;
pub use proxy::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GramConfig {
    pub model: ModelConfig,
    pub chat: ChatConfig,
    pub proxy: ProxyConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_parameters() {
        let config = GramConfig::default();
        assert_eq!(config.model.name, "gemini-2.5-flash");
        assert!((config.model.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.model.top_k, 40);
        assert!((config.model.top_p - 0.95).abs() < f64::EPSILON);
        assert!((config.model.summary_temperature - 0.5).abs() < f64::EPSILON);
        assert!((config.model.suggestion_temperature - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.model.connect_timeout_secs, 10);
        assert_eq!(config.model.request_timeout_secs, 120);
    }

    #[test]
    fn default_chat_and_proxy() {
        let config = GramConfig::default();
        assert_eq!(config.chat.language, "en-IN");
        assert_eq!(config.proxy.port, 3000);
        assert_eq!(config.proxy.bind, "0.0.0.0");
        assert_eq!(config.proxy.static_dir, "public");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GramConfig = toml::from_str(
            r#"
[model]
temperature = 0.2

[chat]
language = "hi-IN"
"#,
        )
        .unwrap();
        assert!((config.model.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.model.top_k, 40);
        assert_eq!(config.chat.language, "hi-IN");
        assert_eq!(config.proxy.port, 3000);
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: GramConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_directive(), "debug");
    }
}
