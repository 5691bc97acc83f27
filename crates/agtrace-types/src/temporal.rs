use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Ledger-assigned timestamp in whole seconds since the UNIX epoch.
///
/// Event timestamps are non-decreasing within one batch's history as the
/// ledger returns it. The traceability service never reorders by this value;
/// it is only carried and rendered.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochSeconds(pub u64);

impl EpochSeconds {
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    /// The epoch itself.
    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochSeconds({})", self.0)
    }
}

impl fmt::Display for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
