use serde::{Deserialize, Serialize};

use crate::extract::{self, NO_ANALYSIS};
use crate::models::chat_entry::{COMPARISON_CHAT_NAMES, DISPLAY_CHAT_NAMES};

/// The analysis of one submitted document.
///
/// Created once per document when a batch is processed and never mutated
/// afterwards. The serialized column names match the exported CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Submission Name")]
    name: String,
    #[serde(rename = "Analysis")]
    analysis: String,
    #[serde(rename = "Thread ID", default)]
    thread_id: Option<String>,
    #[serde(rename = "Message ID", default)]
    message_id: Option<String>,
}

impl ResultRecord {
    /// Build a record. A missing analysis payload is replaced by the
    /// "No analysis available" sentinel.
    pub fn new(name: impl Into<String>, analysis: Option<String>) -> Self {
        Self {
            name: name.into(),
            analysis: analysis.unwrap_or_else(|| NO_ANALYSIS.to_string()),
            thread_id: None,
            message_id: None,
        }
    }

    /// Attach the backend thread id. Empty ids are treated as absent.
    pub fn with_thread_id(mut self, thread_id: Option<String>) -> Self {
        self.thread_id = thread_id.filter(|s| !s.is_empty());
        self
    }

    /// Attach the backend message id. Empty ids are treated as absent.
    pub fn with_message_id(mut self, message_id: Option<String>) -> Self {
        self.message_id = message_id.filter(|s| !s.is_empty());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Narrative text used when comparing submissions.
    pub fn comparison_text(&self) -> String {
        extract::extract(Some(&self.analysis), &COMPARISON_CHAT_NAMES)
    }

    /// Narrative text shown on the submission's own tab.
    pub fn display_text(&self) -> String {
        extract::extract(Some(&self.analysis), &DISPLAY_CHAT_NAMES)
    }

    /// Markdown block for the submission's own tab.
    pub fn display_markdown(&self) -> String {
        format!(
            "### Submission: {}\n\n#### Analysis\n\n{}",
            self.name,
            self.display_text()
        )
    }

    /// The first percentage (`NN%`) mentioned in the raw analysis, if any.
    pub fn match_score(&self) -> Option<u32> {
        first_percentage(&self.analysis)
    }
}

/// Find the first run of ASCII digits immediately followed by `%`.
fn first_percentage(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut run_start: Option<usize> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            run_start.get_or_insert(i);
            continue;
        }
        if b == b'%'
            && let Some(start) = run_start
            && let Ok(score) = text[start..i].parse::<u32>()
        {
            return Some(score);
        }
        run_start = None;
    }

    None
}
