//! Tether - a client for a remote conversational agent
//!
//! Tether exchanges messages with a remote agent service over plain HTTP and
//! over an SSE-like line-oriented streaming transport, extracts tool-invocation
//! instructions embedded in the responses, and executes them against a locally
//! supplied tool registry.

pub mod agent;
pub mod error;
pub mod tools;

pub use error::{Result, TetherError};
