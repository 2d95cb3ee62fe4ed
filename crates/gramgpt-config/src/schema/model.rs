//! Model and generation parameters.

use serde::{Deserialize, Serialize};

/// Remote model settings and per-request generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub api_base: String,
    /// Chat temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Chat top-k (valid range: 1-100).
    pub top_k: u32,
    /// Chat top-p (valid range: 0.0-1.0).
    pub top_p: f64,
    pub max_output_tokens: u32,
    pub summary_temperature: f64,
    pub suggestion_temperature: f64,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
            summary_temperature: 0.5,
            suggestion_temperature: 0.8,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
