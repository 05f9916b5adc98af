//! CLI module for tether - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the health probe,
//! one-shot sends, streamed sends and the interactive loop.

pub mod commands;

pub use commands::Cli;
