//! Pushing the evaluation criteria to the store the backend reads from.

use tracing::info;

use soca_core::models::criteria::CriteriaDocument;

use crate::error::ClientError;
use crate::service::CriteriaStore;

/// Blob name used when the configured storage URL names a container only.
pub const DEFAULT_CRITERIA_BLOB: &str = "criteria.json";

/// Upload the criteria document as pretty-printed JSON, replacing the
/// previous revision.
pub fn update_criteria(
    store: &dyn CriteriaStore,
    blob_name: &str,
    criteria: &CriteriaDocument,
) -> Result<(), ClientError> {
    let body = criteria.to_pretty_json()?;

    store.put_text(blob_name, &body, "application/json")?;

    info!(
        blob_name,
        criteria_len = criteria.job_criteria_text.len(),
        "criteria updated"
    );
    Ok(())
}
