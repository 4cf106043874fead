//! Error types for clamd protocol exchanges.

use std::io;

/// Alias for `Result<T, clamd_proto::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to a clamd daemon.
///
/// Every variant keeps the diagnostic it was raised with: the command name
/// for command-level failures, the raw response text for parse failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Connecting, writing, or reading failed (including timeouts).
    #[error("error while communicating with the server")]
    Communication(#[from] io::Error),

    /// The daemon answered `UNKNOWN COMMAND`.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The command is absent from the daemon's advertised command set.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// The response did not match the grammar expected for the command.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The daemon reported an error while scanning.
    #[error("scan failure: {0}")]
    ScanFailure(String),

    /// A client or command option was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
