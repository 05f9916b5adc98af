//! Locally supplied tools the remote agent may invoke.

pub mod registry;

pub use registry::{Tool, ToolArgs, ToolRegistry};
