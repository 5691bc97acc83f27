use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::TypeError;
use crate::temporal::EpochSeconds;

/// Ledger-assigned batch identifier. Always positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BatchId(u64);

impl BatchId {
    /// Create a batch id, rejecting zero.
    pub fn new(raw: u64) -> Result<Self, TypeError> {
        if raw == 0 {
            return Err(TypeError::InvalidBatchId("batch id must be positive".into()));
        }
        Ok(Self(raw))
    }

    /// The raw integer value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for BatchId {
    type Error = TypeError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BatchId> for u64 {
    fn from(id: BatchId) -> Self {
        id.0
    }
}

impl FromStr for BatchId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        let raw: u64 = s
            .parse()
            .map_err(|_| TypeError::InvalidBatchId(format!("'{s}' is not a positive integer")))?;
        Self::new(raw)
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable descriptor of a tracked unit of product.
///
/// A batch is created once by the ledger and never mutated afterwards; all
/// later activity is recorded as [`crate::SupplyChainEvent`]s that reference it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    /// Free-text product label (e.g. "Cassava", "Cocoa beans").
    pub product_type: String,
    pub creator: ActorId,
    pub created_at: EpochSeconds,
}
