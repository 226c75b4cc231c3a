//! soca-app library root.
//!
//! Session state, configuration and the command layer behind the `soca`
//! binary. Exposed as a library so integration tests can drive a batch
//! against in-memory services.

pub mod commands;
pub mod config;
pub mod error;
pub mod session;
