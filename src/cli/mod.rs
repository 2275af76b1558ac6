//! Command-line interface for music-insights.
//!
//! Every dashboard page is a subcommand that loads once and prints; `shell`
//! runs the live debounced search with preview playback.

mod commands;

pub use commands::{Cli, Commands, run_command};
