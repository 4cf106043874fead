//! Command-line client for the ClamAV clamd daemon.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::missing_docs_in_private_items
)]

mod logging;
mod output;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clamd::{Client, DEFAULT_PORT, DEFAULT_REACHABILITY_TIMEOUT_MS, Platform};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "clamctl", version, about = "Talk to a ClamAV clamd daemon")]
struct Cli {
    /// Daemon hostname or IP address.
    #[arg(long, global = true, env = "CLAMD_HOST", default_value = "localhost")]
    host: String,

    /// Daemon TCP port.
    #[arg(long, global = true, env = "CLAMD_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Socket timeout in milliseconds; blocks indefinitely when unset or 0.
    #[arg(long, global = true, env = "CLAMD_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Path convention of the daemon host (unix, windows, native).
    #[arg(long, global = true, env = "CLAMD_PLATFORM", default_value = "native")]
    platform: Platform,

    /// INSTREAM chunk size in bytes.
    #[arg(long, global = true, env = "CLAMD_CHUNK_SIZE", default_value_t = 2048, allow_negative_numbers = true)]
    chunk_size: i64,

    /// Log protocol exchanges to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the daemon answers PONG.
    Ping,

    /// Print the daemon and signature database version.
    Version,

    /// Print thread pool and memory statistics.
    Stats,

    /// Reload the virus signature databases.
    Reload,

    /// Shut the daemon down.
    Shutdown,

    /// Scan a file or directory on the daemon's filesystem.
    Scan {
        /// Path as seen by the daemon.
        path: PathBuf,
        /// Keep scanning after the first infection.
        #[arg(long = "continue")]
        continue_scan: bool,
        /// Output format.
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Scan a directory on the daemon's filesystem with its thread pool.
    Multiscan {
        /// Path as seen by the daemon.
        path: PathBuf,
        /// Output format.
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Stream a local file (or stdin) to the daemon for scanning.
    Instream {
        /// Local file to send; `-` or nothing reads stdin.
        file: Option<PathBuf>,
        /// Output format.
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the commands the daemon supports.
    Commands,

    /// Check whether the daemon accepts TCP connections.
    Reachable {
        /// Connect timeout for the probe, in milliseconds.
        #[arg(long, default_value_t = DEFAULT_REACHABILITY_TIMEOUT_MS)]
        probe_timeout_ms: u64,
    },

    /// Generate shell completion scripts.
    #[command(hide = true)]
    Completion {
        /// Target shell.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.dispatch() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("clamctl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

impl Cli {
    fn client(&self) -> Result<Client> {
        let mut builder = Client::builder(&self.host)
            .port(self.port)
            .platform(self.platform)
            .chunk_size(self.chunk_size);
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder
            .build()
            .with_context(|| format!("cannot use clamd at {}:{}", self.host, self.port))
    }

    fn dispatch(self) -> Result<ExitCode> {
        if let Command::Completion { shell } = self.command {
            clap_complete::generate(shell, &mut Self::command(), "clamctl", &mut io::stdout());
            return Ok(ExitCode::SUCCESS);
        }

        let client = self.client()?;
        match self.command {
            Command::Ping => {
                client.ping()?;
                println!("PONG");
            }
            Command::Version => println!("{}", client.version()?),
            Command::Stats => println!("{}", client.stats()?),
            Command::Reload => {
                client.reload_virus_databases()?;
                println!("RELOADING");
            }
            Command::Shutdown => client.shutdown_server()?,
            Command::Scan {
                path,
                continue_scan,
                format,
            } => {
                let outcome = client.scan_path(&path, continue_scan)?;
                return output::scan(&path.to_string_lossy(), &outcome, format);
            }
            Command::Multiscan { path, format } => {
                let outcome = client.parallel_scan(&path)?;
                return output::scan(&path.to_string_lossy(), &outcome, format);
            }
            Command::Instream { file, format } => return instream(&client, file, format),
            Command::Commands => {
                let mut names: Vec<_> = client.commands()?.iter().cloned().collect();
                names.sort();
                for name in names {
                    println!("{name}");
                }
            }
            Command::Reachable { probe_timeout_ms } => {
                if !client.is_reachable(Duration::from_millis(probe_timeout_ms)) {
                    println!("unreachable");
                    return Ok(ExitCode::FAILURE);
                }
                println!("reachable");
            }
            Command::Completion { .. } => unreachable!("handled above"),
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Streams a local file, or stdin, through `INSTREAM`.
fn instream(client: &Client, file: Option<PathBuf>, format: OutputFormat) -> Result<ExitCode> {
    match file.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            let f = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
            let outcome = client.scan_reader(f)?;
            output::scan(&path.to_string_lossy(), &outcome, format)
        }
        None => {
            let outcome = client.scan_reader(io::stdin().lock())?;
            output::scan("stream", &outcome, format)
        }
    }
}
