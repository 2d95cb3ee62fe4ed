//! Minimal `.env` loading for the binaries.

use std::path::PathBuf;

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped and
/// surrounding quotes are stripped from values.
pub fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Load the first `.env` found (current directory, then workspace root)
/// without overriding variables already set. Returns the file used.
pub fn load_dotenv() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        PathBuf::from(".env"),
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in candidates {
        let Ok(contents) = std::fs::read_to_string(&path) else {
            continue;
        };
        for (key, value) in parse_dotenv(&contents) {
            if std::env::var_os(&key).is_none() {
                std::env::set_var(key, value);
            }
        }
        return Some(path);
    }
    None
}
