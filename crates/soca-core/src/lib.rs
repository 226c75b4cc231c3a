//! soca-core
//!
//! Pure domain types, analysis-content extraction and prompt construction.
//! No network dependency; this is the shared vocabulary of the SoCa system.

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod prompt;
