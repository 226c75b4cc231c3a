//! Analysis-content extraction.
//!
//! Turns a record's raw analysis payload into the narrative text worth
//! showing. The payload is usually a JSON array of tagged chat entries, but
//! the backend makes no promise about that, so extraction always produces
//! something: the allow-listed contents when it can find them, the raw
//! payload when it cannot.

use serde_json::Value;
use tracing::debug;

use crate::models::chat_entry::ChatEntry;

pub use crate::models::chat_entry::{
    COMPARISON_CHAT_NAMES, ChatNameAllowList, DISPLAY_CHAT_NAMES,
};

/// Shown in place of an analysis that was never received.
pub const NO_ANALYSIS: &str = "No analysis available";

/// Extract the narrative text from an analysis payload.
///
/// Returns the allow-listed entry contents, each followed by a newline, in
/// payload order. Falls back to the payload itself when it is not a JSON
/// array or when no entry matches, and to [`NO_ANALYSIS`] when the payload
/// is absent or empty.
pub fn extract(payload: Option<&str>, allow: &ChatNameAllowList) -> String {
    let Some(payload) = payload.filter(|p| !p.is_empty()) else {
        return NO_ANALYSIS.to_string();
    };

    extract_tagged(payload, allow).unwrap_or_else(|| payload.to_string())
}

/// Collect the allow-listed contents of a payload, or `None` if the payload
/// is not a JSON array or nothing in it matched.
pub fn extract_tagged(payload: &str, allow: &ChatNameAllowList) -> Option<String> {
    let value: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "analysis payload is not JSON, using raw text");
            return None;
        }
    };

    let Some(entries) = value.as_array() else {
        debug!("analysis payload is not a JSON array, using raw text");
        return None;
    };

    let mut text = String::new();
    for entry in entries.iter().map(ChatEntry::decode) {
        if let Some(content) = entry.allowed_content(allow) {
            text.push_str(content);
            text.push('\n');
        }
    }

    if text.is_empty() {
        debug!(
            entries = entries.len(),
            allowed = ?allow.names(),
            "no allow-listed entries in analysis payload"
        );
        return None;
    }

    Some(text)
}
