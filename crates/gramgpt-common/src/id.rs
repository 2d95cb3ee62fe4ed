use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eight hex digits tagging the log lines of one proxied request.
pub fn new_correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Identity of one conversation state. A fresh id is minted whenever the
/// state is replaced (start, restart, clear); a generation compares it
/// before touching history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_is_eight_hex_digits() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn every_state_gets_its_own_id() {
        let first = SessionId::new();
        assert_ne!(first, SessionId::new());
        assert_eq!(first, first);
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let sid = SessionId::new();
        let json = serde_json::to_value(sid).unwrap();
        assert_eq!(json, serde_json::Value::String(sid.to_string()));
    }
}
