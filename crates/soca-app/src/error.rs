use thiserror::Error;

use soca_client::error::ClientError;
use soca_core::error::CoreError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Azure OpenAI API credentials not configured")]
    MissingCredentials,

    #[error("no submissions have been analysed yet")]
    NoResults,

    #[error("no submission named {0:?} in the current batch")]
    UnknownSubmission(String),

    #[error("feedback needs both a thread id and a message id")]
    MissingCorrelationIds,

    #[error("criteria document {0:?} contains no text")]
    EmptyCriteria(String),

    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
