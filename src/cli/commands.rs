//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - health: probe the remote agent once
//! - send: one message, one complete response
//! - stream: one message, chunks printed as they arrive
//! - repl: interactive conversation on a single thread

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tether - talk to a remote conversational agent
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the remote agent's health endpoint
    Health,

    /// Send one message and print the complete response
    Send {
        /// Message text
        message: String,

        /// Conversation thread id
        #[arg(short, long)]
        thread_id: Option<String>,
    },

    /// Send one message and print response chunks as they arrive
    Stream {
        /// Message text
        message: String,

        /// Conversation thread id
        #[arg(short, long)]
        thread_id: Option<String>,
    },

    /// Interactive conversation (default when no subcommand is given)
    Repl,
}
