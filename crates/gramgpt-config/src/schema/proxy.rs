use serde::{Deserialize, Serialize};

/// Settings for the credential-holding HTTP proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub bind: String,
    pub port: u32,
    /// Directory served for every path other than the API routes.
    pub static_dir: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            static_dir: "public".into(),
        }
    }
}
