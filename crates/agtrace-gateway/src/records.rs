use std::fmt;

use serde::{Deserialize, Serialize};

use agtrace_types::{ActorId, BatchId, EpochSeconds};

/// An event exactly as the ledger returns it.
///
/// The event type is still the raw ledger code here; conversion to
/// [`agtrace_types::EventType`] happens in the traceability service so that
/// unknown codes are reported instead of silently mapped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEventRecord {
    pub batch_id: BatchId,
    pub event_type: u8,
    pub actor: ActorId,
    pub timestamp: EpochSeconds,
    pub data_ref: String,
    /// Transaction that emitted the event. Matches the
    /// [`LedgerReceipt::tx_hash`] returned when it was submitted.
    pub tx_hash: TxHash,
}

/// Identifier of an accepted ledger transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn short_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.short_hex())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Acknowledgement that the ledger accepted a write.
///
/// Acceptance says nothing about when the event becomes visible to reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub tx_hash: TxHash,
    pub batch_id: BatchId,
    /// Ledger-wide sequence number of the accepted transaction.
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_hash_formats() {
        let tx = TxHash::from_hash([0xab; 32]);
        assert_eq!(tx.short_hex(), "0xabababab");
        assert_eq!(tx.to_hex().len(), 66);
        assert_eq!(format!("{tx:?}"), "TxHash(0xabababab)");
    }
}
