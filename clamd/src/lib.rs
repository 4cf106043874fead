//! Blocking client for the ClamAV `clamd` daemon.
//!
//! Every call opens its own TCP connection, sends one command, reads the
//! reply until the daemon closes the socket, and parses it. The daemon's
//! `VERSIONCOMMANDS` list is fetched once per [`Client`] and commands it does
//! not advertise are refused locally.
//!
//! # Quick start
//!
//! ```no_run
//! use clamd::{Client, ScanOutcome};
//!
//! let client = Client::builder("localhost").build()?;
//! client.ping()?;
//!
//! match client.scan_reader(&b"X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR"[..])? {
//!     ScanOutcome::Clean => println!("clean"),
//!     ScanOutcome::Infected(found) => println!("infected: {found:?}"),
//! }
//! # Ok::<(), clamd::Error>(())
//! ```

mod client;
mod gate;
mod platform;
mod transport;

pub use clamd_proto::{
    ChunkSize, Command, DEFAULT_CHUNK_SIZE, Error, InStream, Result, ScanOutcome,
};
pub use client::{
    Client, ClientBuilder, DEFAULT_PORT, DEFAULT_REACHABILITY_TIMEOUT,
    DEFAULT_REACHABILITY_TIMEOUT_MS,
};
pub use platform::Platform;
