//! soca-client
//!
//! Blocking HTTP clients for the services SoCa talks to: the submission
//! analysis backend, Azure OpenAI chat completion, and the Azure Blob
//! container that holds the evaluation criteria.

pub mod backend;
pub mod blob;
pub mod criteria;
pub mod error;
pub mod generate;
pub mod openai;
pub mod service;
