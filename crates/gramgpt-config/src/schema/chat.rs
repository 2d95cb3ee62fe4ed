use serde::{Deserialize, Serialize};

/// Conversation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Language tag the chat starts in, e.g. `hi-IN`.
    pub language: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: "en-IN".into(),
        }
    }
}
