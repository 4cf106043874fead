//! Scan report parsing for `SCAN`, `CONTSCAN`, `MULTISCAN` and `INSTREAM`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Some line of the report ends in ` FOUND`.
#[allow(clippy::expect_used)]
static FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.+ FOUND$").expect("FOUND pattern should compile"));

/// One finding: optional `<prefix>: `, then `<path>: <virus> FOUND`.
#[allow(clippy::expect_used)]
static FOUND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+: )?(.+): (.+) FOUND$").expect("finding pattern should compile")
});

/// A single clean line.
#[allow(clippy::expect_used)]
static OK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+ OK$").expect("OK pattern should compile"));

/// The report as a whole ends in ` ERROR`.
#[allow(clippy::expect_used)]
static ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^.+ ERROR$").expect("ERROR pattern should compile"));

/// Result of a scan command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "found", rename_all = "snake_case")]
#[allow(clippy::exhaustive_enums)]
pub enum ScanOutcome {
    /// Nothing was found.
    Clean,
    /// Signatures found, keyed by infected path.
    ///
    /// Each list is non-empty and keeps the order in which the daemon
    /// reported the signatures for that path.
    Infected(BTreeMap<String, Vec<String>>),
}

impl ScanOutcome {
    /// Returns `true` for [`ScanOutcome::Clean`].
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Findings of an infected outcome, `None` when clean.
    pub const fn found_viruses(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Clean => None,
            Self::Infected(found) => Some(found),
        }
    }
}

/// Parses the decoded response of any scan-family command.
///
/// `FOUND` lines take priority: as soon as one is present the report is
/// infected, whatever the other lines say. Otherwise the report is clean
/// when every line ends in ` OK`, a scan failure when it ends in ` ERROR`,
/// and invalid in any other case.
pub fn parse_scan_response(response: &str) -> Result<ScanOutcome> {
    if FOUND.is_match(response) {
        return infected(response);
    }
    if is_clean(response) {
        return Ok(ScanOutcome::Clean);
    }
    if ERROR.is_match(response) {
        return Err(Error::ScanFailure(response.to_owned()));
    }
    Err(Error::InvalidResponse(response.to_owned()))
}

/// Every non-empty line is an `OK` line, and there is at least one.
fn is_clean(response: &str) -> bool {
    let mut lines = response.lines().filter(|l| !l.is_empty()).peekable();
    lines.peek().is_some() && lines.all(|l| OK_LINE.is_match(l))
}

/// Groups the signature names of every finding line by path.
fn infected(response: &str) -> Result<ScanOutcome> {
    let mut found: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for caps in response.lines().filter_map(|l| FOUND_LINE.captures(l)) {
        let (Some(path), Some(virus)) = (caps.get(2), caps.get(3)) else {
            return Err(Error::InvalidResponse(response.to_owned()));
        };
        found
            .entry(path.as_str().to_owned())
            .or_default()
            .push(virus.as_str().to_owned());
    }
    if found.is_empty() {
        return Err(Error::InvalidResponse(response.to_owned()));
    }
    Ok(ScanOutcome::Infected(found))
}
