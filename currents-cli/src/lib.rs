//! Command-line interface for composing Currents feeds from local JSON
//! fixtures.
//!
//! Two subcommands cover the offline workflow: `compose` prints the feed
//! that would be served for a key, and `inspect` prints the scoring
//! explanation behind it. Fixture paths layer from CLI flags, configuration
//! files, and `CURRENTS_*` environment variables.

#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod feed;

pub use error::CliError;
pub(crate) use feed::FeedArgs;

pub(crate) const ARG_FEED_KEY: &str = "key";
pub(crate) const ARG_FEED_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_FEED_MARKETS: &str = "markets";
pub(crate) const ARG_FEED_TAGS: &str = "tags";
pub(crate) const ARG_FEED_PROFILES: &str = "profiles";
pub(crate) const ENV_FEED_KEY: &str = "CURRENTS_CMDS_FEED_KEY";

/// Run the Currents CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, fixture loading, or feed
/// composition fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Compose(args) => feed::run_compose(args, &mut stdout),
        Command::Inspect(args) => feed::run_inspect(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "currents",
    about = "Offline feed-composition utilities for the Currents engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compose the feed served for a key and print it as JSON.
    Compose(FeedArgs),
    /// Print the scoring explanation behind the feed for a key.
    Inspect(FeedArgs),
}
