use async_trait::async_trait;

use agtrace_types::{Actor, Batch, BatchId};

use crate::error::GatewayResult;
use crate::records::{LedgerEventRecord, LedgerReceipt};

/// Access boundary to the shared ledger.
///
/// Every call may suspend for a network-dependent amount of time. A gateway
/// is a single shared handle; implementations own whatever synchronization
/// they need.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Establish the ledger connection.
    async fn connect(&self) -> GatewayResult<()>;

    fn is_connected(&self) -> bool;

    /// Fails with [`crate::GatewayError::NotFound`] if the batch does not exist.
    async fn get_batch(&self, id: BatchId) -> GatewayResult<Batch>;

    /// Events of a batch in ledger order.
    async fn get_batch_history(&self, id: BatchId) -> GatewayResult<Vec<LedgerEventRecord>>;

    /// Submit one event. `event_type` is the raw ledger code.
    async fn record_event(
        &self,
        id: BatchId,
        event_type: u8,
        payload: &str,
    ) -> GatewayResult<LedgerReceipt>;

    /// Number of batches created so far. Batch ids run from 1 to this count.
    async fn batch_count(&self) -> GatewayResult<u64>;
}

/// Session layer boundary: who is calling.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The current caller, or `None` if no one is signed in.
    async fn current_actor(&self) -> Option<Actor>;
}
