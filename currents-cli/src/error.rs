//! Error types emitted by the Currents CLI.
//!
//! Keep this error type reasonably small, as most CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the Currents CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced fixture path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// Reading a fixture file failed.
    #[error("failed to read fixture at {path:?}: {source}")]
    ReadFixture {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Fixture JSON could not be decoded.
    #[error("failed to parse fixture JSON at {path:?}: {source}")]
    ParseFixture {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The requested profile key is not in the profile store.
    #[error("unknown profile key {key:?}; use \"guest\" for the profile-free feed")]
    UnknownProfile { key: String },
    /// Guest feeds skip scoring and therefore have no explanation.
    #[error("guest feeds are composed without scoring and cannot be inspected")]
    GuestNotExplainable,
    /// The composer rejected its configuration.
    #[error(transparent)]
    Compose(#[from] currents_feed::ComposeError),
    /// Serializing the output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
