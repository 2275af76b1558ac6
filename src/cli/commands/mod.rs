//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `charts`: today's chart, year explorer, genres and KPIs
//! - `artists`: top artists and artist detail
//! - `compare`: genre shares across markets
//! - `search`: one-shot search and the interactive shell
//! - `account`: sign-in state and configuration

mod account;
mod artists;
mod charts;
mod compare;
mod search;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::api::Market;
use crate::context::AppContext;
use crate::views::{YearTab, year_options};

pub use account::{cmd_config, cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use artists::{cmd_artist, cmd_artists};
pub use charts::{cmd_genres, cmd_kpi, cmd_today, cmd_year};
pub use compare::cmd_compare;
pub use search::{cmd_search, cmd_shell};

/// Music Insights dashboard
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Analytics API base URL for this run (not saved to config)
    #[arg(long, global = true, env = "MUSIC_INSIGHTS_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Today's top tracks and headline numbers
    Today {
        /// Market code, e.g. IN or US
        #[arg(short, long)]
        market: Option<String>,
    },
    /// Top tracks, artists or genres for a year
    Year {
        /// Year to explore (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long)]
        market: Option<String>,
        /// tracks, artists or genres
        #[arg(short, long, default_value = "tracks")]
        tab: YearTab,
    },
    /// Top artists with an optional name / genre filter
    Artists {
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long)]
        market: Option<String>,
        /// Case-insensitive substring of the name or a genre
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// One artist and their top tracks
    Artist {
        /// Artist id
        id: String,
        #[arg(short, long)]
        market: Option<String>,
    },
    /// Top genres for a year
    Genres {
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long)]
        market: Option<String>,
    },
    /// Compare genre shares across markets
    Compare {
        #[arg(short, long)]
        year: Option<i32>,
        /// Comma separated market codes (default: from config)
        #[arg(long)]
        markets: Option<String>,
    },
    /// Dataset totals and the last snapshot date
    Kpi,
    /// Search artists, tracks and playlists once
    Search {
        /// Search text
        query: String,
    },
    /// Interactive search with preview playback
    Shell,
    /// Sign in (no account backend; any credentials are accepted)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MUSIC_INSIGHTS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the email in the stored session
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the current sign-in state
    Whoami,
    /// Validate a sign-up form
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// Agree to the Terms of Service and Privacy Policy
        #[arg(long)]
        agree_to_terms: bool,
    },
    /// Print the config file location and effective settings
    Config {
        /// Restore default settings
        #[arg(long)]
        reset: bool,
    },
}

/// Run the specified CLI command.
///
/// Pending notifications are printed to stderr afterwards whether or not the
/// command succeeded, then the context is torn down.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let mut ctx = AppContext::init(cli.api_url.as_deref())?;

    let result = match &cli.command {
        Commands::Today { market } => cmd_today(&rt, &ctx, market.as_deref()),
        Commands::Year { year, market, tab } => {
            cmd_year(&rt, &ctx, *year, market.as_deref(), *tab)
        }
        Commands::Artists {
            year,
            market,
            filter,
        } => cmd_artists(&rt, &ctx, *year, market.as_deref(), filter.as_deref()),
        Commands::Artist { id, market } => cmd_artist(&rt, &ctx, id, market.as_deref()),
        Commands::Genres { year, market } => cmd_genres(&rt, &ctx, *year, market.as_deref()),
        Commands::Compare { year, markets } => cmd_compare(&rt, &ctx, *year, markets.as_deref()),
        Commands::Kpi => cmd_kpi(&rt, &ctx),
        Commands::Search { query } => cmd_search(&rt, &ctx, query),
        Commands::Shell => cmd_shell(&rt, &ctx),
        Commands::Login {
            email,
            password,
            remember,
        } => cmd_login(&mut ctx, email, password, *remember),
        Commands::Logout => cmd_logout(&mut ctx),
        Commands::Whoami => cmd_whoami(&ctx),
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            agree_to_terms,
        } => cmd_register(
            &ctx,
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            *agree_to_terms,
        ),
        Commands::Config { reset } => cmd_config(&mut ctx, *reset),
    };

    print_notifications(&ctx);
    rt.block_on(ctx.teardown())?;
    result
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Print queued toasts to stderr
pub(crate) fn print_notifications(ctx: &AppContext) {
    for toast in ctx.drain_notifications() {
        eprintln!("{toast}");
    }
}

/// Market from the command line, or the configured default
pub(crate) fn resolve_market(ctx: &AppContext, market: Option<&str>) -> anyhow::Result<Market> {
    match market {
        Some(code) => Ok(Market::parse(code)?),
        None => Ok(ctx.market()),
    }
}

/// Year from the command line, or the current year. Must be one the charts cover.
pub(crate) fn resolve_year(year: Option<i32>) -> anyhow::Result<i32> {
    let current = chrono::Utc::now().year();
    let year = year.unwrap_or(current);
    if !year_options().contains(&year) {
        anyhow::bail!("Year must be between {} and {}", crate::views::FIRST_YEAR, current);
    }
    Ok(year)
}
