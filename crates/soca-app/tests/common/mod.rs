//! In-memory stand-ins for the remote services.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use soca_client::backend::{ChatResponse, FeedbackResponse};
use soca_client::error::ClientError;
use soca_client::service::{AnalysisService, ChatCompletionService, CriteriaStore};
use soca_core::models::chat::ChatMessage;

/// Replies to `create_chat` from a script, one entry per call.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<ChatResponse, ClientError>>>,
    pub chats: RefCell<Vec<(String, String)>>,
    pub feedback: RefCell<Vec<(String, String, bool)>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<ChatResponse, ClientError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            ..Self::default()
        }
    }
}

pub fn reply(agent_response: &str, thread_id: &str, message_id: &str) -> Result<ChatResponse, ClientError> {
    Ok(ChatResponse {
        agent_response: Some(serde_json::Value::String(agent_response.to_string())),
        thread_id: Some(thread_id.to_string()),
        message_id: Some(message_id.to_string()),
        ..ChatResponse::default()
    })
}

impl AnalysisService for ScriptedBackend {
    fn create_chat(
        &self,
        text: &str,
        identifier: &str,
        _thread_id: Option<&str>,
    ) -> Result<ChatResponse, ClientError> {
        self.chats
            .borrow_mut()
            .push((text.to_string(), identifier.to_string()));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Http("script exhausted".into())))
    }

    fn submit_feedback(
        &self,
        message_id: &str,
        thread_id: &str,
        positive: bool,
    ) -> Result<FeedbackResponse, ClientError> {
        self.feedback
            .borrow_mut()
            .push((message_id.to_string(), thread_id.to_string(), positive));
        Ok(FeedbackResponse {
            message: Some("Feedback submitted successfully".into()),
        })
    }
}

/// Answers every completion with a numbered reply.
#[derive(Default)]
pub struct CountingModel {
    pub calls: Cell<usize>,
    pub prompts: RefCell<Vec<String>>,
}

impl ChatCompletionService for CountingModel {
    fn chat_completion(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        if let Some(last) = messages.last() {
            self.prompts.borrow_mut().push(last.content.clone());
        }
        Some(format!("reply {}", self.calls.get()))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub puts: RefCell<Vec<(String, String)>>,
}

impl CriteriaStore for MemoryStore {
    fn put_text(&self, name: &str, content: &str, _content_type: &str) -> Result<(), ClientError> {
        self.puts
            .borrow_mut()
            .push((name.to_string(), content.to_string()));
        Ok(())
    }
}
