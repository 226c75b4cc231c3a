use pretty_assertions::assert_eq;
use soca_core::export::{followup_download_name, results_csv};
use soca_core::extract::NO_ANALYSIS;
use soca_core::models::chat_entry::{ChatEntry, encode_entries};
use soca_core::models::criteria::CriteriaDocument;
use soca_core::models::record::ResultRecord;

#[test]
fn missing_analysis_defaults_to_sentinel() {
    let record = ResultRecord::new("cv.pdf", None);
    assert_eq!(record.analysis(), NO_ANALYSIS);
    assert_eq!(record.comparison_text(), NO_ANALYSIS);
}

#[test]
fn empty_correlation_ids_are_absent() {
    let record = ResultRecord::new("cv.pdf", Some("ok".into()))
        .with_thread_id(Some(String::new()))
        .with_message_id(Some("msg_1".into()));

    assert_eq!(record.thread_id(), None);
    assert_eq!(record.message_id(), Some("msg_1"));
}

#[test]
fn display_text_omits_lookup_agent() {
    let payload = encode_entries(&[
        ChatEntry::new("applicant_lookup_agent", "External profile."),
        ChatEntry::new("summary", "Good fit."),
    ]);
    let record = ResultRecord::new("cv.pdf", Some(payload));

    assert_eq!(record.display_text(), "Good fit.\n");
    assert_eq!(record.comparison_text(), "External profile.\nGood fit.\n");
    assert_eq!(
        record.display_markdown(),
        "### Submission: cv.pdf\n\n#### Analysis\n\nGood fit.\n"
    );
}

#[test]
fn match_score_finds_first_percentage() {
    let record = ResultRecord::new("a", Some("**Overall Match:** 12/15 (80%), was 75%".into()));
    assert_eq!(record.match_score(), Some(80));

    let record = ResultRecord::new("b", Some("no score here, just a % sign".into()));
    assert_eq!(record.match_score(), None);

    let record = ResultRecord::new("c", Some("100%".into()));
    assert_eq!(record.match_score(), Some(100));
}

#[test]
fn csv_export_uses_column_labels() {
    let records = vec![
        ResultRecord::new("a.pdf", Some("First, with comma".into()))
            .with_thread_id(Some("t1".into()))
            .with_message_id(Some("m1".into())),
        ResultRecord::new("b.docx", None),
    ];

    let csv = results_csv(&records).expect("csv export");
    assert_eq!(
        csv,
        "Submission Name,Analysis,Thread ID,Message ID\n\
         a.pdf,\"First, with comma\",t1,m1\n\
         b.docx,No analysis available,,\n"
    );
}

#[test]
fn record_json_round_trips_with_labels() {
    let record = ResultRecord::new("a.pdf", Some("text".into())).with_thread_id(Some("t".into()));
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(json["Submission Name"], "a.pdf");
    assert_eq!(json["Thread ID"], "t");

    let back: ResultRecord = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, record);
}

#[test]
fn followup_file_name_replaces_spaces() {
    assert_eq!(
        followup_download_name("Jane Doe CV.pdf"),
        "followup_questions_Jane_Doe_CV.pdf.txt"
    );
}

#[test]
fn criteria_document_is_two_space_indented() {
    let doc = CriteriaDocument::from_text("Rust, 3+ years");
    assert_eq!(
        doc.to_pretty_json().expect("json"),
        "{\n  \"job_criteria_text\": \"Rust, 3+ years\"\n}"
    );
}
