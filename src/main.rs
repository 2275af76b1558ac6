//! Music Insights - a terminal dashboard for music chart analytics.
//!
//! Browses charts, artists and genre trends from the analytics API, with a
//! live debounced search that can preview tracks through the audio output.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod preview;
pub mod search;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_insights=info".parse()?))
        .init();

    cli::run_command(&args)
}
