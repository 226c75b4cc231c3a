use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The rubric submissions are scored against, as stored for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaDocument {
    pub job_criteria_text: String,
}

impl CriteriaDocument {
    /// Wrap free text extracted from an uploaded criteria document.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            job_criteria_text: text.into(),
        }
    }

    /// Two-space indented JSON, the format the criteria store expects.
    pub fn to_pretty_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
