use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("server returned {status}")]
    Status { status: u16 },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid blob storage URL: {0}")]
    BlobUrl(String),

    #[error("core error: {0}")]
    Core(#[from] soca_core::error::CoreError),
}

impl From<ureq::Error> for ClientError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => ClientError::Status { status },
            other => ClientError::Http(other.to_string()),
        }
    }
}
