//! Tolerant decoding of the tagged chat entries inside an analysis payload.
//!
//! The analysis backend serializes its agent conversation as a JSON array of
//! Python objects, each wrapped in a `__dict__` envelope:
//!
//! ```json
//! {"__dict__": {
//!     "chat_name": "summary",
//!     "chat_response": {"chat_message": {"__dict__": {"content": "..."}}}
//! }}
//! ```
//!
//! None of this shape is contractually guaranteed. Every field is decoded
//! on its own into `Some` (present, right type) or `None` (missing, `null`,
//! or wrong type), so a malformed field never poisons its siblings and a
//! malformed entry never poisons the array.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// One tagged unit of an analysis payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatEntry {
    /// Agent tag, e.g. `"summary"` or `"applicant_lookup_agent"`.
    pub chat_name: Option<String>,
    /// Narrative text produced by that agent.
    pub content: Option<String>,
}

impl ChatEntry {
    pub fn new(chat_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat_name: Some(chat_name.into()),
            content: Some(content.into()),
        }
    }

    /// Decode one array element. Never fails: anything that does not match
    /// the expected shape comes back with absent fields.
    pub fn decode(value: &Value) -> Self {
        let envelope = EntryEnvelope::deserialize(value).unwrap_or_default();
        let body = envelope.inner.unwrap_or_default();

        let content = body
            .chat_response
            .and_then(|r| r.chat_message)
            .and_then(|m| m.inner)
            .and_then(|m| m.content);

        Self {
            chat_name: body.chat_name,
            content,
        }
    }

    /// The entry's content, if its tag is allow-listed and the content is
    /// present and non-empty.
    pub fn allowed_content(&self, allow: &ChatNameAllowList) -> Option<&str> {
        let name = self.chat_name.as_deref()?;
        if !allow.contains(name) {
            return None;
        }
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    /// Encode back into the backend's wire shape.
    pub fn to_value(&self) -> Value {
        json!({
            "__dict__": {
                "chat_name": self.chat_name,
                "chat_response": {
                    "chat_message": {
                        "__dict__": { "content": self.content }
                    }
                }
            }
        })
    }
}

/// Serialize a list of entries the way the backend returns them.
pub fn encode_entries(entries: &[ChatEntry]) -> String {
    Value::Array(entries.iter().map(ChatEntry::to_value).collect()).to_string()
}

// ── Allow-lists ──────────────────────────────────────────────────────────────

/// A fixed set of `chat_name` tags whose content is worth showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatNameAllowList(&'static [&'static str]);

impl ChatNameAllowList {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name)
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Tags extracted when comparing submissions or generating follow-ups.
pub const COMPARISON_CHAT_NAMES: ChatNameAllowList =
    ChatNameAllowList::new(&["summary", "applicant_lookup_agent"]);

/// Tags extracted when displaying a single submission. The lookup agent's
/// output is not part of the per-submission view.
pub const DISPLAY_CHAT_NAMES: ChatNameAllowList = ChatNameAllowList::new(&["summary"]);

// ── Wire shape ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct EntryEnvelope {
    #[serde(rename = "__dict__", default, deserialize_with = "lenient")]
    inner: Option<EntryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct EntryBody {
    #[serde(default, deserialize_with = "lenient")]
    chat_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    chat_response: Option<ResponseBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default, deserialize_with = "lenient")]
    chat_message: Option<MessageEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageEnvelope {
    #[serde(rename = "__dict__", default, deserialize_with = "lenient")]
    inner: Option<MessageBody>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default, deserialize_with = "lenient")]
    content: Option<String>,
}

/// Decode a field as `Some(T)` when it has the right shape and `None`
/// otherwise, instead of failing the enclosing struct.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
