//! The clamd client: one method per daemon command.

use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clamd_proto::{
    ChunkSize, Command, DEFAULT_CHUNK_SIZE, InStream, Result, ScanOutcome,
    parse_scan_response, reply,
};

use crate::gate::CapabilityGate;
use crate::platform::Platform;
use crate::transport;

/// Port clamd listens on by default.
pub const DEFAULT_PORT: u16 = 3310;

/// [`DEFAULT_REACHABILITY_TIMEOUT`] in milliseconds.
pub const DEFAULT_REACHABILITY_TIMEOUT_MS: u64 = 3000;

/// Timeout suggested for [`Client::is_reachable`].
pub const DEFAULT_REACHABILITY_TIMEOUT: Duration =
    Duration::from_millis(DEFAULT_REACHABILITY_TIMEOUT_MS);

/// Builder for a [`Client`].
///
/// Defaults: port 3310, [`Platform::Native`], no timeout, 2048-byte chunks,
/// command set fetched from the daemon on first use.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use clamd::{Client, Platform};
///
/// let client = Client::builder("clamav.internal")
///     .port(3311)
///     .platform(Platform::Unix)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok::<(), clamd::Error>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "a ClientBuilder does nothing until .build() is called"]
pub struct ClientBuilder {
    /// Hostname or IP address of the daemon.
    host: String,
    /// Explicit socket address; skips resolution of `host` and `port`.
    addr: Option<SocketAddr>,
    /// TCP port of the daemon.
    port: u16,
    /// Path convention of the daemon's host.
    platform: Platform,
    /// Connect/read/write timeout. `None` blocks indefinitely.
    timeout: Option<Duration>,
    /// Unvalidated `INSTREAM` chunk size.
    chunk_size: i64,
    /// Known command set; skips `VERSIONCOMMANDS` when set.
    capabilities: Option<HashSet<String>>,
}

impl ClientBuilder {
    /// Starts a builder for the daemon at `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            addr: None,
            port: DEFAULT_PORT,
            platform: Platform::default(),
            timeout: None,
            chunk_size: i64::from(DEFAULT_CHUNK_SIZE.get()),
            capabilities: None,
        }
    }

    /// Sets the daemon address; host and port are then ignored.
    pub const fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets the TCP port (default: 3310).
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the daemon's path convention (default: [`Platform::Native`]).
    pub const fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the connect, read, and write timeout (default: none).
    ///
    /// A zero timeout blocks indefinitely, like no timeout at all.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        self
    }

    /// Sets the `INSTREAM` chunk size in bytes (default: 2048).
    ///
    /// Validated by [`build`](Self::build); zero or negative sizes fail.
    pub const fn chunk_size(mut self, size: i64) -> Self {
        self.chunk_size = size;
        self
    }

    /// Declares the daemon's command set instead of asking for it.
    pub fn capabilities<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(commands.into_iter().map(Into::into).collect());
        self
    }

    /// Validates the configuration and resolves the daemon address.
    ///
    /// Option errors are reported before any name resolution; resolution
    /// failures surface as [`Communication`](crate::Error::Communication).
    /// An address set with [`addr`](Self::addr) is used as is.
    pub fn build(self) -> Result<Client> {
        let chunk_size = ChunkSize::new(self.chunk_size)?;

        let server = match self.addr {
            Some(addr) => addr,
            None => (self.host.as_str(), self.port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no address found for {}:{}", self.host, self.port),
                    )
                })?,
        };

        let gate = self
            .capabilities
            .map_or_else(CapabilityGate::default, CapabilityGate::preloaded);

        Ok(Client {
            server,
            platform: self.platform,
            timeout: self.timeout,
            chunk_size,
            gate,
        })
    }
}

/// Blocking clamd client.
///
/// Cheap to share between threads: calls only contend on the one-time
/// command set fetch.
#[derive(Debug)]
pub struct Client {
    /// Resolved daemon address.
    server: SocketAddr,
    /// Path convention of the daemon's host.
    platform: Platform,
    /// Connect/read/write timeout.
    timeout: Option<Duration>,
    /// Chunk size for [`Client::scan_reader`].
    chunk_size: ChunkSize,
    /// Memoized `VERSIONCOMMANDS` result.
    gate: CapabilityGate,
}

impl Client {
    /// Creates a client for `server` with default settings.
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            platform: Platform::default(),
            timeout: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            gate: CapabilityGate::default(),
        }
    }

    /// Starts a [`ClientBuilder`] for the daemon at `host`.
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(host)
    }

    /// Daemon address.
    pub const fn server(&self) -> SocketAddr {
        self.server
    }

    /// Path convention of the daemon's host.
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Socket timeout, `None` when calls block indefinitely.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Chunk size used by [`Client::scan_reader`].
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Pings the daemon; succeeds only on a `PONG` reply.
    pub fn ping(&self) -> Result<()> {
        let response = self.send(Command::Ping, None)?;
        reply::expect_exact(&response, "PONG")
    }

    /// Daemon and signature database version.
    pub fn version(&self) -> Result<String> {
        self.send(Command::Version, None)
    }

    /// Multi-line statistics block.
    pub fn stats(&self) -> Result<String> {
        self.send(Command::Stats, None)
    }

    /// Asks the daemon to reload its signature databases.
    pub fn reload_virus_databases(&self) -> Result<()> {
        let response = self.send(Command::Reload, None)?;
        reply::expect_exact(&response, "RELOADING")?;
        tracing::info!(server = %self.server, "reloading the virus databases");
        Ok(())
    }

    /// Stops the daemon. Any reply is accepted.
    pub fn shutdown_server(&self) -> Result<()> {
        self.send(Command::Shutdown, None)?;
        tracing::info!(server = %self.server, "shutting down the ClamAV server");
        Ok(())
    }

    /// Scans a server-side path, stopping at the first infection.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<ScanOutcome> {
        self.scan_path(path, false)
    }

    /// Scans a server-side path; `continue_scan` keeps going past infections.
    pub fn scan_path(&self, path: impl AsRef<Path>, continue_scan: bool) -> Result<ScanOutcome> {
        let command = if continue_scan {
            Command::ContScan
        } else {
            Command::Scan
        };
        self.scan_server_path(command, path.as_ref())
    }

    /// Scans a server-side path to the end, reporting every infection.
    pub fn cont_scan(&self, path: impl AsRef<Path>) -> Result<ScanOutcome> {
        self.scan_server_path(Command::ContScan, path.as_ref())
    }

    /// Scans a server-side path using the daemon's thread pool (`MULTISCAN`).
    pub fn parallel_scan(&self, path: impl AsRef<Path>) -> Result<ScanOutcome> {
        self.scan_server_path(Command::MultiScan, path.as_ref())
    }

    /// Streams `reader` to the daemon with the configured chunk size.
    pub fn scan_reader<R: Read>(&self, reader: R) -> Result<ScanOutcome> {
        self.scan_stream(InStream::with_chunk_size(reader, self.chunk_size))
    }

    /// Runs a prepared streaming scan.
    pub fn scan_stream<R: Read>(&self, mut stream: InStream<R>) -> Result<ScanOutcome> {
        self.check(Command::InStream)?;
        let response = transport::exchange(&self.server, self.timeout, Command::InStream, |s| {
            let sent = stream.upload(s)?;
            tracing::trace!(bytes = sent, "streamed payload");
            Ok(())
        })?;
        parse_scan_response(&response)
    }

    /// Commands advertised by the daemon, fetched on first use.
    pub fn commands(&self) -> Result<Arc<HashSet<String>>> {
        self.gate.commands(|| self.fetch_commands())
    }

    /// Whether a TCP connection to the daemon can be opened within `timeout`.
    ///
    /// Nothing is sent; refusals and timeouts yield `false`.
    pub fn is_reachable(&self, timeout: Duration) -> bool {
        transport::probe(&self.server, timeout)
    }

    /// Sends a path-scan command with the path in server syntax.
    fn scan_server_path(&self, command: Command, path: &Path) -> Result<ScanOutcome> {
        let server_path = self.platform.to_server_path(path);
        let response = self.send(command, Some(&server_path))?;
        parse_scan_response(&response)
    }

    /// Gate check, then a plain single-frame exchange.
    fn send(&self, command: Command, argument: Option<&str>) -> Result<String> {
        self.check(command)?;
        let frame = command.frame(argument);
        transport::exchange(&self.server, self.timeout, command, |s| {
            s.write_all(&frame)
        })
    }

    /// Fails before any I/O when the daemon does not advertise `command`.
    fn check(&self, command: Command) -> Result<()> {
        self.gate.check(command, || self.fetch_commands())
    }

    /// Sends `VERSIONCOMMANDS` over a dedicated connection.
    fn fetch_commands(&self) -> Result<HashSet<String>> {
        let command = Command::VersionCommands;
        let frame = command.frame(None);
        let response = transport::exchange(&self.server, self.timeout, command, |s| {
            s.write_all(&frame)
        })?;
        reply::parse_commands(&response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV6, TcpListener};

    use clamd_proto::Error;

    use super::*;

    #[test]
    fn builder_defaults() {
        let client = Client::builder("127.0.0.1").build().unwrap();
        assert_eq!(client.server().port(), DEFAULT_PORT);
        assert_eq!(client.platform(), Platform::Native);
        assert_eq!(client.timeout(), None);
        assert_eq!(client.chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn builder_overrides() {
        let client = Client::builder("127.0.0.1")
            .port(3311)
            .platform(Platform::Unix)
            .timeout(Duration::from_millis(500))
            .chunk_size(10_000)
            .build()
            .unwrap();
        assert_eq!(
            client.server(),
            SocketAddr::from((Ipv4Addr::LOCALHOST, 3311))
        );
        assert_eq!(client.platform(), Platform::Unix);
        assert_eq!(client.timeout(), Some(Duration::from_millis(500)));
        assert_eq!(client.chunk_size().get(), 10_000);
    }

    #[test]
    fn builder_from_addr() {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 4000));
        let client = ClientBuilder::new("ignored.invalid").addr(addr).build().unwrap();
        assert_eq!(client.server(), addr);
    }

    #[test]
    fn builder_keeps_ipv6_scope() {
        let addr = SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::LOCALHOST, 3310, 0, 7));
        let client = Client::builder("localhost").addr(addr).build().unwrap();
        assert_eq!(client.server(), addr);
        let SocketAddr::V6(v6) = client.server() else {
            panic!("expected an IPv6 address");
        };
        assert_eq!(v6.scope_id(), 7);
    }

    #[test]
    fn invalid_chunk_size_fails_before_resolution() {
        for size in [0, -5] {
            let err = Client::builder("name.that.does.not.resolve.invalid")
                .chunk_size(size)
                .build()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn zero_timeout_blocks_indefinitely() {
        let client = Client::builder("127.0.0.1")
            .timeout(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn unsupported_command_opens_no_connection() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        listener.set_nonblocking(true).unwrap();

        let client = Client::builder("127.0.0.1")
            .port(listener.local_addr().unwrap().port())
            .capabilities(["PING", "VERSION"])
            .build()
            .unwrap();

        let err = client.scan("/tmp").unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(ref name) if name == "SCAN"));
        let err = client.scan_reader(io::empty()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(ref name) if name == "INSTREAM"));

        let accepted = listener.accept().unwrap_err();
        assert_eq!(accepted.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn preloaded_commands_are_reported() {
        let client = Client::builder("127.0.0.1")
            .capabilities(["PING"])
            .build()
            .unwrap();
        let commands = client.commands().unwrap();
        assert_eq!(commands.len(), 1);
        assert!(commands.contains("PING"));
    }
}
