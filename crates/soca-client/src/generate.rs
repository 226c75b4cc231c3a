//! Comparative summaries and follow-up questions.
//!
//! A failed completion never reaches the caller as an error: it comes back
//! as a fixed sentinel string the UI can render in place of the result.

use tracing::info;

use soca_core::models::record::ResultRecord;
use soca_core::prompt;

use crate::service::ChatCompletionService;

pub const SUMMARY_TEMPERATURE: f32 = 0.7;
pub const SUMMARY_MAX_TOKENS: u32 = 2000;
pub const FOLLOWUP_TEMPERATURE: f32 = 0.7;
pub const FOLLOWUP_MAX_TOKENS: u32 = 2000;

pub const SUMMARY_FAILED: &str = "Failed to generate summary due to an error.";
pub const FOLLOWUP_FAILED: &str = "Failed to generate follow-up questions due to an error.";

/// Objective, non-ranking comparison of every record in the batch.
pub fn summarize_submissions(
    service: &dyn ChatCompletionService,
    records: &[ResultRecord],
) -> String {
    info!(submissions = records.len(), "generating comparative summary");

    let messages = prompt::comparison_messages(records);
    service
        .chat_completion(&messages, SUMMARY_TEMPERATURE, SUMMARY_MAX_TOKENS)
        .unwrap_or_else(|| SUMMARY_FAILED.to_string())
}

/// Five categorized follow-up questions for one record.
pub fn generate_followup_questions(
    service: &dyn ChatCompletionService,
    record: &ResultRecord,
) -> String {
    info!(submission = record.name(), "generating follow-up questions");

    let messages = prompt::followup_messages(record);
    service
        .chat_completion(&messages, FOLLOWUP_TEMPERATURE, FOLLOWUP_MAX_TOKENS)
        .unwrap_or_else(|| FOLLOWUP_FAILED.to_string())
}
