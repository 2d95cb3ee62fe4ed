//! Parsing of structured follow-up suggestions.

use crate::AiError;

pub const MAX_SUGGESTIONS: usize = 3;

/// Parse a model reply expected to be a JSON array of strings.
///
/// A surrounding markdown code fence is tolerated. Non-string and blank
/// entries are dropped and at most [`MAX_SUGGESTIONS`] are kept.
pub fn parse_suggestions(raw: &str) -> Result<Vec<String>, AiError> {
    let body = strip_code_fence(raw.trim());
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AiError::MalformedResponse(format!("suggestions are not JSON: {e}")))?;

    let items = value
        .as_array()
        .ok_or_else(|| AiError::MalformedResponse("suggestions are not an array".into()))?;

    Ok(items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(String::from)
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (`json`) up to the first newline
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
