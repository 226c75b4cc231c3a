//! Azure OpenAI chat-completion client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use soca_core::models::chat::ChatMessage;

use crate::error::ClientError;
use crate::service::ChatCompletionService;

pub const API_VERSION: &str = "2023-12-01-preview";

/// Azure OpenAI resource settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_key: String,
    pub deployment_name: String,
}

impl OpenAiConfig {
    /// Both the endpoint and key must be set before any call is attempted.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn parse_completion(body: &Value) -> Result<String, ClientError> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.pointer("/message/content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ClientError::ResponseParse(
                "the API did not return the expected response".to_string(),
            )
        })
}

pub struct AzureOpenAiClient {
    agent: ureq::Agent,
    config: OpenAiConfig,
}

impl AzureOpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            config,
        }
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment_name,
        )
    }

    /// Send a chat-completion request and return the reply text.
    pub fn try_chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ClientError> {
        let request = CompletionRequest {
            messages,
            temperature,
            max_tokens,
        };

        info!(
            deployment = %self.config.deployment_name,
            messages = messages.len(),
            max_tokens,
            "requesting chat completion"
        );

        let mut resp = self
            .agent
            .post(&self.completions_url())
            .header("api-key", self.config.api_key.as_str())
            .send_json(&request)?;
        let body: Value = resp.body_mut().read_json()?;
        let content = parse_completion(&body)?;

        info!(reply_len = content.len(), "chat completion received");
        Ok(content)
    }
}

impl ChatCompletionService for AzureOpenAiClient {
    fn chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String> {
        match self.try_chat_completion(messages, temperature, max_tokens) {
            Ok(content) => Some(content),
            Err(e) => {
                error!(error = %e, "Azure OpenAI API error");
                None
            }
        }
    }
}
