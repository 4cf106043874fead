//! Command capability gate.
//!
//! The daemon's advertised command set is fetched at most once per client
//! and then trusted for the client's lifetime.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use clamd_proto::{Command, Error, Result};

/// Shared, immutable command set.
pub(crate) type Capabilities = Arc<HashSet<String>>;

/// Lazily initialised command set.
///
/// The mutex is held across the fetch, so concurrent first callers wait for
/// a single introspection round trip instead of racing their own. A failed
/// fetch leaves the slot empty and the next caller tries again.
#[derive(Debug, Default)]
pub(crate) struct CapabilityGate {
    /// `None` until the first successful fetch.
    commands: Mutex<Option<Capabilities>>,
}

impl CapabilityGate {
    /// Creates a gate that already knows the daemon's commands.
    pub(crate) fn preloaded(commands: HashSet<String>) -> Self {
        Self {
            commands: Mutex::new(Some(Arc::new(commands))),
        }
    }

    /// Returns the command set, running `fetch` if it is not known yet.
    pub(crate) fn commands(
        &self,
        fetch: impl FnOnce() -> Result<HashSet<String>>,
    ) -> Result<Capabilities> {
        let mut slot = self
            .commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(commands) = slot.as_ref() {
            return Ok(Arc::clone(commands));
        }
        let fetched = Arc::new(fetch()?);
        tracing::debug!(count = fetched.len(), "cached daemon command set");
        *slot = Some(Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Fails with [`Error::UnsupportedCommand`] unless `command` is advertised.
    pub(crate) fn check(
        &self,
        command: Command,
        fetch: impl FnOnce() -> Result<HashSet<String>>,
    ) -> Result<()> {
        if self.commands(fetch)?.contains(command.name()) {
            Ok(())
        } else {
            Err(Error::UnsupportedCommand(command.name().to_owned()))
        }
    }
}
