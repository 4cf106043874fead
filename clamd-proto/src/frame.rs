//! Command line codec.
//!
//! A request is `<prefix><NAME>[ <argument>]<terminator>`. Arguments are
//! passed through verbatim; the protocol has no escaping.

use std::io::Read;

use crate::error::{Error, Result};

/// Full response sent by clamd for a command it does not recognise.
pub const UNKNOWN_COMMAND: &str = "UNKNOWN COMMAND";

/// Request and response delimiting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Framing {
    /// `z` prefix, NUL terminator.
    Null,
    /// `n` prefix, `\n` terminator.
    Newline,
}

impl Framing {
    /// Byte that opens the command line.
    pub const fn prefix(self) -> u8 {
        match self {
            Self::Null => b'z',
            Self::Newline => b'n',
        }
    }

    /// Byte that closes the command line and the response.
    pub const fn terminator(self) -> u8 {
        match self {
            Self::Null => b'\0',
            Self::Newline => b'\n',
        }
    }
}

/// Encodes a command line.
pub fn encode(name: &str, argument: Option<&str>, framing: Framing) -> Vec<u8> {
    let arg_len = argument.map_or(0, |a| a.len() + 1);
    let mut buf = Vec::with_capacity(name.len() + arg_len + 2);
    buf.push(framing.prefix());
    buf.extend_from_slice(name.as_bytes());
    if let Some(arg) = argument {
        buf.push(b' ');
        buf.extend_from_slice(arg.as_bytes());
    }
    buf.push(framing.terminator());
    buf
}

/// Decodes a complete response.
///
/// Strips one trailing terminator if present. A bare `UNKNOWN COMMAND`
/// is turned into [`Error::UnknownCommand`] naming `name`.
pub fn decode(raw: &[u8], name: &str, framing: Framing) -> Result<String> {
    let body = raw
        .strip_suffix(&[framing.terminator()])
        .unwrap_or(raw);
    let text = String::from_utf8_lossy(body).into_owned();
    if text == UNKNOWN_COMMAND {
        return Err(Error::UnknownCommand(name.to_owned()));
    }
    Ok(text)
}

/// Reads from `r` until the peer closes, then [`decode`]s the bytes.
pub fn read_response(r: &mut impl Read, name: &str, framing: Framing) -> Result<String> {
    let mut raw = Vec::new();
    r.read_to_end(&mut raw)?;
    decode(&raw, name, framing)
}
