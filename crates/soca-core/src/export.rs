//! Result export: the CSV download and generated-text file names.

use std::io::Write;

use crate::error::CoreError;
use crate::models::record::ResultRecord;

/// Write the batch as CSV with a `Submission Name, Analysis, Thread ID,
/// Message ID` header.
pub fn write_results_csv<W: Write>(records: &[ResultRecord], writer: W) -> Result<(), CoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render the batch as a CSV string.
pub fn results_csv(records: &[ResultRecord]) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    write_results_csv(records, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// File name offered when saving a record's follow-up questions.
pub fn followup_download_name(record_name: &str) -> String {
    format!("followup_questions_{}.txt", record_name.replace(' ', "_"))
}
