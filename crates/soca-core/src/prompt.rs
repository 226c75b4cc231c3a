//! Prompt construction for the chat-completion model.
//!
//! Both builders are pure: the same records always produce the same text.
//! The non-ranking policy lives only in the instructions below; nothing
//! checks that the model honours it, so callers render the reply as prose.

use crate::models::chat::ChatMessage;
use crate::models::record::ResultRecord;

pub const COMPARISON_SYSTEM_PROMPT: &str = "\
You are an AI assistant that helps compare and summarize multiple submission \
analyses. Provide objective, balanced comparisons and never rank the \
submissions against each other.";

pub const COMPARISON_PREAMBLE: &str = "\
Please provide a comprehensive, objective comparison of the following \
submission analyses:\n\n";

pub const COMPARISON_SUFFIX: &str = "\
Please compare the submissions objectively against the evaluation criteria. \
Create a table summarizing the similarities and differences between the \
submissions for each key aspect, followed by a short narrative summary. \
Do not rank the submissions, do not recommend one submission over another, \
and do not name a strongest or weakest submission; describe each submission \
on its own merits.";

pub const FOLLOWUP_SYSTEM_PROMPT: &str = "\
You are an AI assistant that helps reviewers prepare follow-up questions for \
the authors of submissions. Questions must be specific, neutral and grounded \
in the analysis provided.";

/// The instruction block appended once to every follow-up prompt.
pub const FOLLOWUP_CATEGORY_BLOCK: &str = "\
Generate exactly 5 follow-up questions, one for each of the following categories:
1. Clarification: resolve something in the submission that is ambiguous or unclear.
2. Elaboration: ask for more depth on a point the submission only touches on.
3. Coverage gaps: probe a criterion the submission does not address.
4. Motivation: explore why the author made the choices described.
5. Preference: ask which option the author would favour and why.

For each question, state its category and give a one or two sentence \
rationale explaining why it is worth asking, based on the analysis above. \
Format the output as markdown.";

/// Build the prompt asking for an objective comparison of all records.
pub fn build_comparison_prompt(records: &[ResultRecord]) -> String {
    let mut prompt = String::from(COMPARISON_PREAMBLE);

    for record in records {
        prompt.push_str(&format!("Submission: {}\n", record.name()));
        prompt.push_str(&format!("Analysis: {}\n\n", record.comparison_text()));
    }

    prompt.push_str(COMPARISON_SUFFIX);
    prompt
}

/// Build the prompt asking for follow-up questions about one record.
pub fn build_followup_prompt(record: &ResultRecord) -> String {
    format!(
        "Based on the following analysis of the submission \"{name}\", prepare \
         follow-up questions for its author.\n\n\
         Submission: {name}\n\
         Analysis:\n{analysis}\n\n\
         {FOLLOWUP_CATEGORY_BLOCK}",
        name = record.name(),
        analysis = record.comparison_text(),
    )
}

/// System and user messages for a comparative summary.
pub fn comparison_messages(records: &[ResultRecord]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(COMPARISON_SYSTEM_PROMPT),
        ChatMessage::user(build_comparison_prompt(records)),
    ]
}

/// System and user messages for one record's follow-up questions.
pub fn followup_messages(record: &ResultRecord) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(FOLLOWUP_SYSTEM_PROMPT),
        ChatMessage::user(build_followup_prompt(record)),
    ]
}
