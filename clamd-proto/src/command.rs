//! The closed set of clamd commands and their wire properties.

use std::fmt;

use crate::frame::{self, Framing};

/// A command understood by clamd.
///
/// Each variant fixes its wire token and its [`Framing`]; the table in
/// [`Command::name`] / [`Command::framing`] is the single source for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command {
    /// Liveness check, answered with `PONG`.
    Ping,
    /// Daemon and signature database version.
    Version,
    /// Multi-line thread pool and memory statistics.
    Stats,
    /// Reload the signature databases, answered with `RELOADING`.
    Reload,
    /// Stop the daemon.
    Shutdown,
    /// Scan a server-side path, stopping at the first infection.
    Scan,
    /// Scan a server-side path, continuing past infections.
    ContScan,
    /// Scan a server-side path with the daemon's thread pool.
    MultiScan,
    /// Scan bytes streamed over the connection.
    InStream,
    /// Version string followed by the supported command list.
    VersionCommands,
}

impl Command {
    /// Every command, in wire-table order.
    pub const ALL: [Self; 10] = [
        Self::Ping,
        Self::Version,
        Self::Stats,
        Self::Reload,
        Self::Shutdown,
        Self::Scan,
        Self::ContScan,
        Self::MultiScan,
        Self::InStream,
        Self::VersionCommands,
    ];

    /// ASCII token sent on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ping => "PING",
            Self::Version => "VERSION",
            Self::Stats => "STATS",
            Self::Reload => "RELOAD",
            Self::Shutdown => "SHUTDOWN",
            Self::Scan => "SCAN",
            Self::ContScan => "CONTSCAN",
            Self::MultiScan => "MULTISCAN",
            Self::InStream => "INSTREAM",
            Self::VersionCommands => "VERSIONCOMMANDS",
        }
    }

    /// Framing used for both the request and the response terminator.
    pub const fn framing(self) -> Framing {
        match self {
            Self::Stats | Self::ContScan | Self::MultiScan | Self::VersionCommands => {
                Framing::Newline
            }
            Self::Ping
            | Self::Version
            | Self::Reload
            | Self::Shutdown
            | Self::Scan
            | Self::InStream => Framing::Null,
        }
    }

    /// Encodes this command with an optional argument.
    pub fn frame(self, argument: Option<&str>) -> Vec<u8> {
        frame::encode(self.name(), argument, self.framing())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
