//! Parsers for the non-scan replies.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Marker preceding the command list in a `VERSIONCOMMANDS` reply.
pub const COMMANDS_MARKER: &str = "| COMMANDS:";

/// Checks that a reply is exactly `expected`.
pub fn expect_exact(response: &str, expected: &str) -> Result<()> {
    if response == expected {
        Ok(())
    } else {
        Err(Error::InvalidResponse(response.to_owned()))
    }
}

/// Extracts the advertised command set from a `VERSIONCOMMANDS` reply.
pub fn parse_commands(response: &str) -> Result<HashSet<String>> {
    let (_, list) = response
        .split_once(COMMANDS_MARKER)
        .ok_or_else(|| Error::InvalidResponse(response.to_owned()))?;
    Ok(list.split_whitespace().map(str::to_owned).collect())
}
