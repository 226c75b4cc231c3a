mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use soca_client::error::ClientError;
use soca_client::openai::{AzureOpenAiClient, OpenAiConfig, parse_completion};
use soca_client::service::ChatCompletionService;
use soca_core::models::chat::ChatMessage;

fn config(endpoint: &str) -> OpenAiConfig {
    OpenAiConfig {
        endpoint: endpoint.to_string(),
        api_key: "secret-key".to_string(),
        deployment_name: "gpt-4o".to_string(),
    }
}

#[test]
fn configured_requires_endpoint_and_key() {
    assert!(config("https://res.openai.azure.com").is_configured());
    assert!(!OpenAiConfig::default().is_configured());
    assert!(
        !OpenAiConfig {
            api_key: "  ".into(),
            ..config("https://res.openai.azure.com")
        }
        .is_configured()
    );
}

#[test]
fn completions_url_targets_deployment() {
    let client = AzureOpenAiClient::new(config("https://res.openai.azure.com/"));
    assert_eq!(
        client.completions_url(),
        "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2023-12-01-preview"
    );
}

#[test]
fn parse_completion_reads_first_choice() {
    let body = json!({"choices": [{"message": {"role": "assistant", "content": "A table."}}, {"message": {"content": "ignored"}}]});
    assert_eq!(parse_completion(&body).expect("content"), "A table.");
}

#[test]
fn parse_completion_rejects_unexpected_shapes() {
    for body in [
        json!({}),
        json!({"choices": []}),
        json!({"choices": [{"message": {}}]}),
        json!({"choices": [{"message": {"content": null}}]}),
    ] {
        assert!(matches!(
            parse_completion(&body),
            Err(ClientError::ResponseParse(_))
        ));
    }
}

#[test]
fn chat_completion_sends_messages_and_key() {
    let (url, server) = common::serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"| Aspect | A | B |"}}]}"#,
    );
    let client = AzureOpenAiClient::new(config(&url));

    let reply = client.chat_completion(
        &[ChatMessage::system("sys"), ChatMessage::user("compare")],
        0.7,
        2000,
    );
    assert_eq!(reply.as_deref(), Some("| Aspect | A | B |"));

    let request = server.join().expect("server thread");
    assert_eq!(
        request.request_line,
        "POST /openai/deployments/gpt-4o/chat/completions?api-version=2023-12-01-preview HTTP/1.1"
    );
    assert_eq!(request.header("api-key"), Some("secret-key"));

    let body = request.json();
    assert_eq!(body["max_tokens"], 2000);
    assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
    assert_eq!(body["messages"][1], json!({"role": "user", "content": "compare"}));
}

#[test]
fn chat_completion_returns_none_on_failure() {
    let (url, server) = common::serve_once(200, r#"{"choices":[]}"#);
    let client = AzureOpenAiClient::new(config(&url));

    assert_eq!(client.chat_completion(&[ChatMessage::user("x")], 0.7, 10), None);
    server.join().expect("server thread");

    let (url, server) = common::serve_once(401, r#"{"error":"bad key"}"#);
    let client = AzureOpenAiClient::new(config(&url));

    assert_eq!(client.chat_completion(&[ChatMessage::user("x")], 0.7, 10), None);
    server.join().expect("server thread");
}
