use std::cell::RefCell;

use pretty_assertions::assert_eq;
use soca_client::generate::{
    FOLLOWUP_FAILED, SUMMARY_FAILED, SUMMARY_MAX_TOKENS, generate_followup_questions,
    summarize_submissions,
};
use soca_client::service::ChatCompletionService;
use soca_core::models::chat::{ChatMessage, ChatRole};
use soca_core::models::record::ResultRecord;
use soca_core::prompt::{build_comparison_prompt, build_followup_prompt};

struct ScriptedModel {
    reply: Option<String>,
    calls: RefCell<Vec<(Vec<ChatMessage>, f32, u32)>>,
}

impl ScriptedModel {
    fn new(reply: Option<&str>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ChatCompletionService for ScriptedModel {
    fn chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String> {
        self.calls
            .borrow_mut()
            .push((messages.to_vec(), temperature, max_tokens));
        self.reply.clone()
    }
}

fn records() -> Vec<ResultRecord> {
    vec![
        ResultRecord::new("a.pdf", Some("Alpha".into())),
        ResultRecord::new("b.pdf", Some("Beta".into())),
    ]
}

#[test]
fn summary_sends_comparison_prompt() {
    let model = ScriptedModel::new(Some("| Aspect | a.pdf | b.pdf |"));
    let records = records();

    assert_eq!(summarize_submissions(&model, &records), "| Aspect | a.pdf | b.pdf |");

    let calls = model.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (messages, temperature, max_tokens) = &calls[0];
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[1].content, build_comparison_prompt(&records));
    assert_eq!(*temperature, 0.7);
    assert_eq!(*max_tokens, SUMMARY_MAX_TOKENS);
}

#[test]
fn failed_summary_becomes_sentinel() {
    let model = ScriptedModel::new(None);
    assert_eq!(summarize_submissions(&model, &records()), SUMMARY_FAILED);
}

#[test]
fn followups_send_followup_prompt() {
    let model = ScriptedModel::new(Some("1. Clarification: ..."));
    let records = records();

    assert_eq!(
        generate_followup_questions(&model, &records[1]),
        "1. Clarification: ..."
    );
    assert_eq!(
        model.calls.borrow()[0].0[1].content,
        build_followup_prompt(&records[1])
    );
}

#[test]
fn failed_followups_become_sentinel() {
    let model = ScriptedModel::new(None);
    assert_eq!(
        generate_followup_questions(&model, &records()[0]),
        FOLLOWUP_FAILED
    );
}
