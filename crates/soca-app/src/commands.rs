//! The operations the CLI exposes, written against the service traits so
//! they run the same against real clients and in-memory fakes.

use std::path::Path;

use tracing::{error, info, warn};

use soca_client::backend::FeedbackResponse;
use soca_client::criteria::update_criteria;
use soca_client::generate::{generate_followup_questions, summarize_submissions};
use soca_client::openai::{AzureOpenAiClient, OpenAiConfig};
use soca_client::service::{AnalysisService, ChatCompletionService, CriteriaStore};
use soca_core::export::write_results_csv;
use soca_core::models::criteria::CriteriaDocument;
use soca_text::{TextExtractor, UploadedFile};

use crate::error::CommandError;
use crate::session::Session;

pub const MISSING_CREDENTIALS_WARNING: &str = "⚠️ Azure OpenAI API credentials not configured. \
Please add them to your configuration to enable the comparative summary feature.";

/// A chat-completion client, or `None` when the endpoint or key is
/// missing. Nothing downstream calls the model without one.
pub fn completion_client(config: &OpenAiConfig) -> Option<AzureOpenAiClient> {
    if config.is_configured() {
        Some(AzureOpenAiClient::new(config.clone()))
    } else {
        warn!("Azure OpenAI credentials not configured");
        None
    }
}

// ── Batch processing ─────────────────────────────────────────────────────────

/// A document that produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSubmission {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: Vec<SkippedSubmission>,
}

/// Analyse a batch of documents one at a time, in order.
///
/// Starting a batch discards the previous results and generated text. A
/// backend failure skips that document only. `on_progress` receives the
/// fraction handled after each document.
pub fn process_submissions<P>(
    session: &mut Session,
    files: &[UploadedFile],
    extractor: &dyn TextExtractor,
    backend: &dyn AnalysisService,
    mut on_progress: P,
) -> BatchReport
where
    P: FnMut(f32),
{
    let mut report = BatchReport::default();
    if files.is_empty() {
        return report;
    }

    session.begin_batch(files.len());

    for (i, file) in files.iter().enumerate() {
        let text = extractor.extract_text(file);
        let identifier = format!("submission_{}", i + 1);

        let record = match backend.create_chat(&text, &identifier, None) {
            Ok(response) => {
                let name = session.unique_name(&file.name);
                info!(file = %file.name, identifier, "submission analysed");
                report.processed += 1;
                Some(response.into_record(name))
            }
            Err(e) => {
                error!(file = %file.name, identifier, error = %e, "submission analysis failed");
                report.skipped.push(SkippedSubmission {
                    name: file.name.clone(),
                    error: e.to_string(),
                });
                None
            }
        };

        on_progress(session.advance(record));
    }

    session.complete();
    report
}

// ── Generated text ───────────────────────────────────────────────────────────

/// The comparative summary for the current batch, generated on first use.
///
/// Without a model the missing-credentials warning is returned and cached
/// as a placeholder, so a later call with a model still generates.
pub fn comparative_summary(
    session: &mut Session,
    model: Option<&dyn ChatCompletionService>,
) -> Result<String, CommandError> {
    if session.results().is_empty() {
        return Err(CommandError::NoResults);
    }
    if let Some(cached) = session.cache().summary()
        && (cached.generated || model.is_none())
    {
        return Ok(cached.text.clone());
    }

    let Some(model) = model else {
        session
            .cache_mut()
            .store_summary(MISSING_CREDENTIALS_WARNING, false);
        return Ok(MISSING_CREDENTIALS_WARNING.to_string());
    };

    let summary = summarize_submissions(model, session.results());
    session.cache_mut().store_summary(summary.clone(), true);
    Ok(summary)
}

pub fn regenerate_summary(
    session: &mut Session,
    model: Option<&dyn ChatCompletionService>,
) -> Result<String, CommandError> {
    session.cache_mut().evict_summary();
    comparative_summary(session, model)
}

/// Follow-up questions for one submission, generated on first use.
pub fn followup_questions(
    session: &mut Session,
    name: &str,
    model: Option<&dyn ChatCompletionService>,
) -> Result<String, CommandError> {
    let record = session
        .record(name)
        .ok_or_else(|| CommandError::UnknownSubmission(name.to_string()))?;

    if let Some(cached) = session.cache().followups(name) {
        return Ok(cached.to_string());
    }

    let model = model.ok_or(CommandError::MissingCredentials)?;
    let questions = generate_followup_questions(model, record);
    session.cache_mut().store_followups(name, questions.clone());
    Ok(questions)
}

pub fn regenerate_followups(
    session: &mut Session,
    name: &str,
    model: Option<&dyn ChatCompletionService>,
) -> Result<String, CommandError> {
    session.cache_mut().evict_followups(name);
    followup_questions(session, name, model)
}

// ── Feedback, criteria, export ───────────────────────────────────────────────

/// Rate an analysis, identified by the thread and message ids shown in
/// [`results_table`].
pub fn submit_feedback(
    backend: &dyn AnalysisService,
    thread_id: &str,
    message_id: &str,
    positive: bool,
) -> Result<FeedbackResponse, CommandError> {
    let thread_id = thread_id.trim();
    let message_id = message_id.trim();
    if thread_id.is_empty() || message_id.is_empty() {
        return Err(CommandError::MissingCorrelationIds);
    }

    let response = backend.submit_feedback(message_id, thread_id, positive)?;
    info!(thread_id, message_id, positive, "feedback submitted");
    Ok(response)
}

/// Extract the criteria document's text and upload it as the criteria JSON.
pub fn update_criteria_from_file(
    file: &UploadedFile,
    extractor: &dyn TextExtractor,
    store: &dyn CriteriaStore,
    blob_name: &str,
) -> Result<CriteriaDocument, CommandError> {
    let text = extractor.extract_text(file);
    if text.trim().is_empty() {
        return Err(CommandError::EmptyCriteria(file.name.clone()));
    }

    let criteria = CriteriaDocument::from_text(text);
    update_criteria(store, blob_name, &criteria)?;
    Ok(criteria)
}

pub fn export_csv(session: &Session, path: &Path) -> Result<(), CommandError> {
    if session.results().is_empty() {
        return Err(CommandError::NoResults);
    }
    let file = std::fs::File::create(path)?;
    write_results_csv(session.results(), file)?;
    info!(path = %path.display(), rows = session.results().len(), "results exported");
    Ok(())
}

/// Markdown table of the batch with each submission's match score and the
/// ids `soca feedback` needs.
pub fn results_table(session: &Session) -> String {
    let mut table = String::from(
        "| Submission | Match Score | Thread ID | Message ID |\n|---|---|---|---|\n",
    );
    for record in session.results() {
        let score = record
            .match_score()
            .map(|s| format!("{s}%"))
            .unwrap_or_else(|| "N/A".to_string());
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            record.name(),
            score,
            record.thread_id().unwrap_or("-"),
            record.message_id().unwrap_or("-"),
        ));
    }
    table
}
