//! Wire protocol for the clamd control-and-scan socket.
//!
//! Requests are a single command line, prefixed with `z` and terminated by a
//! NUL byte, or prefixed with `n` and terminated by `\n`. Responses are read
//! until the daemon closes the connection. `INSTREAM` follows its command line
//! with `[u32 big-endian length][data]` chunks and a zero-length terminator.

mod command;
mod error;
pub mod frame;
mod instream;
pub mod reply;
mod scan;

pub use command::Command;
pub use error::{Error, Result};
pub use frame::Framing;
pub use instream::{ChunkSize, DEFAULT_CHUNK_SIZE, InStream};
pub use scan::{ScanOutcome, parse_scan_response};
