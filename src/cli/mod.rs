//! Command-line interface for wavefinder.
//!
//! This module provides CLI commands for searching, trending, playlist
//! listing and stream resolution.

mod commands;

pub use commands::{Cli, Commands, run_command};
