//! Client for the submission-analysis backend.
//!
//! Three endpoints are used:
//!
//! - `POST /chat`: analyse one submission. The document text travels
//!   inside `user_prompt` as a JSON-encoded object carrying the criteria
//!   revision and a per-batch identifier.
//! - `PUT /messages/{message_id}/feedback`: thumbs up or down on an
//!   analysis.
//! - `GET /conversations/{thread_id}`: full message history of a thread.
//!
//! Every request carries HTTP basic auth.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use soca_core::models::record::ResultRecord;

use crate::error::ClientError;
use crate::service::AnalysisService;

/// Connection settings for the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// e.g. `http://localhost:8000/api/v1` (no trailing slash needed).
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Criteria revision the backend should score against.
    pub revision_id: String,
    pub user_id: String,
    pub conversation_flow: String,
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub thread_id: String,
    pub user_id: String,
    /// JSON-encoded [`UserPrompt`].
    pub user_prompt: String,
    pub conversation_flow: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrompt {
    pub revision_id: String,
    pub identifier: String,
    #[serde(rename = "Page_1")]
    pub page_1: String,
}

/// Response to `POST /chat`. Every field is optional; the backend omits
/// whatever it could not produce.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    /// Usually a JSON string holding the tagged chat entries, occasionally
    /// already-decoded JSON.
    #[serde(default)]
    pub agent_response: Option<Value>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub token_count: Option<u64>,
    #[serde(default)]
    pub max_token_count: Option<u64>,
    #[serde(default)]
    pub memory_summary: Option<String>,
}

impl ChatResponse {
    /// The analysis payload as text. Non-string JSON is re-encoded so the
    /// extractor sees the same shape either way.
    pub fn analysis_payload(&self) -> Option<String> {
        match self.agent_response.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Turn the response into the record for the named submission.
    pub fn into_record(self, name: impl Into<String>) -> ResultRecord {
        let analysis = self.analysis_payload();
        ResultRecord::new(name, analysis)
            .with_thread_id(self.thread_id)
            .with_message_id(self.message_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub thread_id: String,
    pub message_id: String,
    pub user_id: String,
    pub positive_feedback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// One message of a backend conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub positive_feedback: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub role: String,
    pub content: String,
}

// ── Request construction ─────────────────────────────────────────────────────

/// Build the `POST /chat` body. A fresh thread id is minted when none is
/// given.
pub fn build_chat_request(
    config: &BackendConfig,
    text: &str,
    identifier: &str,
    thread_id: Option<&str>,
) -> Result<ChatRequest, ClientError> {
    let user_prompt = UserPrompt {
        revision_id: config.revision_id.clone(),
        identifier: identifier.to_string(),
        page_1: text.to_string(),
    };

    Ok(ChatRequest {
        thread_id: thread_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        user_id: config.user_id.clone(),
        user_prompt: serde_json::to_string(&user_prompt)?,
        conversation_flow: config.conversation_flow.clone(),
    })
}

/// `Authorization` header value for HTTP basic auth.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct BackendClient {
    agent: ureq::Agent,
    config: BackendConfig,
    base_url: String,
    auth_header: String,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let auth_header = basic_auth_header(&config.username, &config.password);
        Self {
            agent: ureq::Agent::new_with_defaults(),
            config,
            base_url,
            auth_header,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Fetch the full message history of a thread.
    pub fn get_conversation(&self, thread_id: &str) -> Result<Vec<ConversationMessage>, ClientError> {
        let url = format!("{}/conversations/{thread_id}", self.base_url);

        info!(thread_id, "fetching conversation");

        let mut resp = self
            .agent
            .get(&url)
            .header("Authorization", self.auth_header.as_str())
            .call()?;
        let messages: Vec<ConversationMessage> = resp.body_mut().read_json()?;

        info!(thread_id, count = messages.len(), "conversation fetched");
        Ok(messages)
    }
}

impl AnalysisService for BackendClient {
    fn create_chat(
        &self,
        text: &str,
        identifier: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatResponse, ClientError> {
        let url = format!("{}/chat", self.base_url);
        let request = build_chat_request(&self.config, text, identifier, thread_id)?;

        info!(
            identifier,
            thread_id = %request.thread_id,
            text_len = text.len(),
            "submitting document for analysis"
        );

        let mut resp = self
            .agent
            .post(&url)
            .header("Authorization", self.auth_header.as_str())
            .send_json(&request)?;
        let response: ChatResponse = resp.body_mut().read_json()?;

        info!(
            identifier,
            message_id = response.message_id.as_deref().unwrap_or(""),
            token_count = response.token_count.unwrap_or(0),
            "analysis received"
        );

        Ok(response)
    }

    fn submit_feedback(
        &self,
        message_id: &str,
        thread_id: &str,
        positive: bool,
    ) -> Result<FeedbackResponse, ClientError> {
        let url = format!("{}/messages/{message_id}/feedback", self.base_url);
        let request = FeedbackRequest {
            thread_id: thread_id.to_string(),
            message_id: message_id.to_string(),
            user_id: self.config.user_id.clone(),
            positive_feedback: positive,
        };

        info!(message_id, thread_id, positive, "submitting feedback");

        let mut resp = self
            .agent
            .put(&url)
            .header("Authorization", self.auth_header.as_str())
            .send_json(&request)?;
        let response: FeedbackResponse = resp.body_mut().read_json()?;

        Ok(response)
    }
}
