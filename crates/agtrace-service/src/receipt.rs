use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use agtrace_gateway::TxHash;
use agtrace_payload::PayloadDigest;
use agtrace_types::{BatchId, EventType};

/// Whether an accepted event was already visible to history reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PropagationStatus {
    /// The event showed up in the history read that followed submission.
    Confirmed,
    /// The ledger accepted the event but it was not (yet) visible. Callers
    /// that need it must re-query later.
    PendingPropagation,
}

impl fmt::Display for PropagationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::PendingPropagation => write!(f, "pending propagation"),
        }
    }
}

/// Receipt for an event the ledger accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Client-side correlation id (UUID v7, time ordered).
    pub submission_id: Uuid,
    pub batch_id: BatchId,
    pub event_type: EventType,
    pub tx_hash: TxHash,
    /// Ledger-wide transaction sequence number.
    pub sequence: u64,
    pub payload_digest: PayloadDigest,
    pub status: PropagationStatus,
}

impl SubmissionReceipt {
    pub fn is_confirmed(&self) -> bool {
        self.status == PropagationStatus::Confirmed
    }
}
