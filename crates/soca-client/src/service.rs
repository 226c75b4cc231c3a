//! Seams between the session layer and the remote services.
//!
//! The session layer only sees these traits, so a batch can be driven by
//! the real HTTP clients or by in-memory fakes.

use soca_core::models::chat::ChatMessage;

use crate::backend::{ChatResponse, FeedbackResponse};
use crate::error::ClientError;

/// The submission-analysis backend.
pub trait AnalysisService {
    /// Submit one document's text for analysis.
    fn create_chat(
        &self,
        text: &str,
        identifier: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatResponse, ClientError>;

    /// Rate a previously returned analysis.
    fn submit_feedback(
        &self,
        message_id: &str,
        thread_id: &str,
        positive: bool,
    ) -> Result<FeedbackResponse, ClientError>;
}

/// A chat-completion model.
pub trait ChatCompletionService {
    /// Returns the model's reply, or `None` on any transport or
    /// response-shape failure. Failures are logged by the implementation.
    fn chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String>;
}

/// Remote storage for the evaluation criteria document.
pub trait CriteriaStore {
    /// Create or overwrite a named text object.
    fn put_text(&self, name: &str, content: &str, content_type: &str) -> Result<(), ClientError>;
}
