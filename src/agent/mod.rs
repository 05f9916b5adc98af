//! Remote agent client - HTTP + SSE communication with tool-call extraction
//!
//! This module provides:
//! - AgentEndpoint configuration and URL building
//! - RemoteAgent client with health probe, synchronous send and streaming send
//! - Stream chunk classification for the line-oriented transport
//! - Tool call dispatch against a local registry
//! - The per-turn call log buffer

pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod log;
pub mod streaming;

pub use client::{
    AUTH_FAILED_SENTINEL, ChatRequest, ERROR_SENTINEL_PREFIX, RemoteAgent, RemoteAgentConfig,
    is_error_sentinel,
};
pub use dispatch::{FunctionCall, ToolCallRequest};
pub use endpoint::AgentEndpoint;
pub use log::{CallLog, ToolCallRecord};
pub use streaming::{MessageStream, StreamChunk, classify_line};
