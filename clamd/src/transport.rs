//! Per-call TCP connections.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use clamd_proto::{Command, Result, frame};

/// Opens a connection, applying `timeout` to connect, read, and write.
///
/// `None` blocks indefinitely.
fn connect(server: &SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let stream = match timeout {
        Some(t) => TcpStream::connect_timeout(server, t)?,
        None => TcpStream::connect(server)?,
    };
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;
    Ok(stream)
}

/// Runs one request/response exchange for `command`.
///
/// `send` writes the request. The reply is read until the daemon closes the
/// connection, then decoded with the command's framing. The socket is
/// dropped, and therefore closed, on every return path.
pub(crate) fn exchange(
    server: &SocketAddr,
    timeout: Option<Duration>,
    command: Command,
    send: impl FnOnce(&mut TcpStream) -> io::Result<()>,
) -> Result<String> {
    tracing::trace!(%server, %command, "connecting");
    let mut stream = connect(server, timeout)?;

    tracing::trace!(%command, "sending");
    send(&mut stream)?;
    stream.flush()?;

    let response = frame::read_response(&mut stream, command.name(), command.framing())?;
    tracing::debug!(%command, %response, "received response");
    Ok(response)
}

/// Opens and closes a bare connection without sending anything.
pub(crate) fn probe(server: &SocketAddr, timeout: Duration) -> bool {
    match TcpStream::connect_timeout(server, timeout) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(%server, error = %e, "clamd is not reachable");
            false
        }
    }
}
