//! `INSTREAM` chunk upload.
//!
//! After the `zINSTREAM\0` command line the client sends
//! `[u32 big-endian length][data]` records and closes the stream with a
//! single zero length. clamd answers with a regular scan report.

use std::io::{self, Read, Write};

use crate::command::Command;
use crate::error::{Error, Result};

/// Chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: ChunkSize = ChunkSize(2048);

/// Upper bound of a single read from the byte source.
///
/// Always positive and representable in the 4-byte length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkSize(u32);

impl ChunkSize {
    /// Validates a chunk size.
    ///
    /// Zero, negative, and sizes that do not fit the `u32` length prefix
    /// fail with [`Error::InvalidConfiguration`].
    pub fn new(size: i64) -> Result<Self> {
        u32::try_from(size)
            .ok()
            .filter(|&n| n > 0)
            .map(Self)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "chunk size must be between 1 and {}, got {size}",
                    u32::MAX
                ))
            })
    }

    /// The size in bytes.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        DEFAULT_CHUNK_SIZE
    }
}

impl TryFrom<i64> for ChunkSize {
    type Error = Error;

    fn try_from(size: i64) -> Result<Self> {
        Self::new(size)
    }
}

/// A streaming scan request over a caller-supplied byte source.
#[derive(Debug)]
pub struct InStream<R> {
    /// Bytes to scan.
    source: R,
    /// Maximum bytes per chunk record.
    chunk_size: ChunkSize,
}

impl<R: Read> InStream<R> {
    /// Creates a streaming request, failing fast on an invalid chunk size.
    pub fn new(source: R, chunk_size: i64) -> Result<Self> {
        Ok(Self::with_chunk_size(source, ChunkSize::new(chunk_size)?))
    }

    /// Creates a streaming request with an already validated chunk size.
    pub const fn with_chunk_size(source: R, chunk_size: ChunkSize) -> Self {
        Self { source, chunk_size }
    }

    /// The configured chunk size.
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Writes the command line, every chunk, and the zero-length terminator.
    ///
    /// Each length prefix and each data block is a separate `write_all`, in
    /// production order. Returns the number of payload bytes sent.
    pub fn upload<W: Write + ?Sized>(&mut self, sink: &mut W) -> io::Result<u64> {
        sink.write_all(&Command::InStream.frame(None))?;

        let mut buf = vec![0u8; self.chunk_size.get() as usize];
        let mut total = 0u64;
        loop {
            let n = match self.source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            write_chunk(sink, &buf[..n])?;
            total += n as u64;
        }

        sink.write_all(&0u32.to_be_bytes())?;
        sink.flush()?;
        Ok(total)
    }
}

/// Writes one `[length][data]` record.
fn write_chunk<W: Write + ?Sized>(sink: &mut W, data: &[u8]) -> io::Result<()> {
    let len = u32::try_from(data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk exceeds u32::MAX"))?;
    sink.write_all(&len.to_be_bytes())?;
    sink.write_all(data)
}
