use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use agtrace_types::{ActorId, Batch, BatchId, EpochSeconds, EventType};

use crate::error::{GatewayError, GatewayResult};
use crate::records::{LedgerEventRecord, LedgerReceipt, TxHash};
use crate::traits::LedgerGateway;

/// Configuration for [`InMemoryLedgerGateway`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryGatewayConfig {
    /// Address recorded as the actor of every submitted event, standing in
    /// for the wallet that would sign the transaction.
    pub signer: ActorId,
    /// Number of history reads of a batch that miss a newly accepted event
    /// before it becomes visible. `0` makes writes visible immediately.
    pub propagation_lag: u32,
    /// When set, timestamps come from a manual clock starting here instead of
    /// the wall clock.
    pub start_time: Option<u64>,
    /// Manual clock step per assigned timestamp.
    pub tick_secs: u64,
}

impl Default for InMemoryGatewayConfig {
    fn default() -> Self {
        Self {
            signer: ActorId::new("0x0000000000000000000000000000000000000001"),
            propagation_lag: 0,
            start_time: None,
            tick_secs: 60,
        }
    }
}

/// In-memory ledger for tests, local demos, and embedding.
///
/// Batches get sequential ids starting at 1. Accepted events are held back
/// from history reads for `propagation_lag` reads of their batch, which
/// reproduces the read-after-write staleness of a real ledger.
pub struct InMemoryLedgerGateway {
    config: InMemoryGatewayConfig,
    inner: RwLock<GatewayState>,
}

#[derive(Default)]
struct GatewayState {
    connected: bool,
    batches: Vec<Batch>,
    visible: HashMap<BatchId, Vec<LedgerEventRecord>>,
    pending: Vec<PendingEvent>,
    manual_clock: Option<u64>,
    last_timestamp: u64,
    sequence: u64,
    submissions: u64,
    history_failure: Option<String>,
    next_rejection: Option<String>,
}

struct PendingEvent {
    record: LedgerEventRecord,
    reads_remaining: u32,
}

impl GatewayState {
    fn next_timestamp(&mut self, tick_secs: u64) -> EpochSeconds {
        let candidate = match self.manual_clock {
            Some(t) => {
                self.manual_clock = Some(t.saturating_add(tick_secs));
                t
            }
            None => EpochSeconds::now().as_secs(),
        };
        let ts = candidate.max(self.last_timestamp);
        self.last_timestamp = ts;
        EpochSeconds::new(ts)
    }

    /// Make a record visible, keeping each batch's history ordered by
    /// timestamp. Records with equal timestamps keep arrival order.
    fn publish(&mut self, record: LedgerEventRecord) {
        let history = self.visible.entry(record.batch_id).or_default();
        let at = history.partition_point(|r| r.timestamp <= record.timestamp);
        history.insert(at, record);
    }

    fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get((id.get() - 1) as usize)
    }

    fn ensure_connected(&self) -> GatewayResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(GatewayError::Unavailable)
        }
    }
}

impl InMemoryLedgerGateway {
    pub fn new(config: InMemoryGatewayConfig) -> Self {
        let state = GatewayState {
            manual_clock: config.start_time,
            ..GatewayState::default()
        };
        Self {
            config,
            inner: RwLock::new(state),
        }
    }

    /// A gateway that is already connected.
    pub fn connected(config: InMemoryGatewayConfig) -> Self {
        let gateway = Self::new(config);
        if let Ok(mut state) = gateway.inner.write() {
            state.connected = true;
        }
        gateway
    }

    pub fn config(&self) -> &InMemoryGatewayConfig {
        &self.config
    }

    /// Create a batch owned by the configured signer.
    ///
    /// Batch creation is not part of the gateway contract; this stands in for
    /// the external creation action.
    pub fn create_batch(&self, product_type: &str) -> GatewayResult<Batch> {
        let mut state = self.write_state()?;
        let id = BatchId::new(state.batches.len() as u64 + 1)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let created_at = state.next_timestamp(self.config.tick_secs);
        let batch = Batch {
            id,
            product_type: product_type.to_string(),
            creator: self.config.signer.clone(),
            created_at,
        };
        state.batches.push(batch.clone());
        debug!(batch = %id, product = product_type, "batch created");
        Ok(batch)
    }

    /// Append a record straight into visible history, bypassing submission.
    ///
    /// Used to seed harvest events and to inject records a well-behaved
    /// client would never produce.
    pub fn append_record(
        &self,
        batch_id: BatchId,
        event_type: u8,
        actor: ActorId,
        data_ref: &str,
    ) -> GatewayResult<LedgerEventRecord> {
        let mut state = self.write_state()?;
        if state.batch(batch_id).is_none() {
            return Err(GatewayError::NotFound(batch_id));
        }
        let timestamp = state.next_timestamp(self.config.tick_secs);
        state.sequence += 1;
        let record = LedgerEventRecord {
            batch_id,
            event_type,
            actor,
            timestamp,
            data_ref: data_ref.to_string(),
            tx_hash: tx_hash(state.sequence, batch_id, event_type, data_ref),
        };
        state.publish(record.clone());
        Ok(record)
    }

    /// Drop the connection.
    pub fn disconnect(&self) {
        if let Ok(mut state) = self.inner.write() {
            state.connected = false;
        }
    }

    /// Make history reads fail with a transport error until cleared.
    pub fn set_history_failure(&self, reason: Option<&str>) {
        if let Ok(mut state) = self.inner.write() {
            state.history_failure = reason.map(str::to_string);
        }
    }

    /// Reject the next submission with the given reason.
    pub fn reject_next_submission(&self, reason: &str) {
        if let Ok(mut state) = self.inner.write() {
            state.next_rejection = Some(reason.to_string());
        }
    }

    /// Number of `record_event` calls that reached the gateway, accepted or
    /// not.
    pub fn submission_count(&self) -> u64 {
        self.inner.read().map(|s| s.submissions).unwrap_or(0)
    }

    /// Accepted events not yet visible to history reads.
    pub fn pending_count(&self) -> usize {
        self.inner.read().map(|s| s.pending.len()).unwrap_or(0)
    }

    fn read_state(&self) -> GatewayResult<RwLockReadGuard<'_, GatewayState>> {
        self.inner
            .read()
            .map_err(|_| GatewayError::Transport("ledger read lock poisoned".into()))
    }

    fn write_state(&self) -> GatewayResult<RwLockWriteGuard<'_, GatewayState>> {
        self.inner
            .write()
            .map_err(|_| GatewayError::Transport("ledger write lock poisoned".into()))
    }
}

impl Default for InMemoryLedgerGateway {
    fn default() -> Self {
        Self::new(InMemoryGatewayConfig::default())
    }
}

#[async_trait]
impl LedgerGateway for InMemoryLedgerGateway {
    async fn connect(&self) -> GatewayResult<()> {
        let mut state = self.write_state()?;
        if !state.connected {
            state.connected = true;
            info!(signer = %self.config.signer, "connected to in-memory ledger");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.inner.read().map(|s| s.connected).unwrap_or(false)
    }

    async fn get_batch(&self, id: BatchId) -> GatewayResult<Batch> {
        let state = self.read_state()?;
        state.ensure_connected()?;
        state.batch(id).cloned().ok_or(GatewayError::NotFound(id))
    }

    async fn get_batch_history(&self, id: BatchId) -> GatewayResult<Vec<LedgerEventRecord>> {
        let mut state = self.write_state()?;
        state.ensure_connected()?;
        if let Some(reason) = &state.history_failure {
            return Err(GatewayError::Transport(reason.clone()));
        }
        if state.batch(id).is_none() {
            return Err(GatewayError::NotFound(id));
        }

        // Age this batch's pending events by one read.
        let mut still_pending = Vec::with_capacity(state.pending.len());
        for mut pending in std::mem::take(&mut state.pending) {
            if pending.record.batch_id != id {
                still_pending.push(pending);
            } else if pending.reads_remaining == 0 {
                state.publish(pending.record);
            } else {
                pending.reads_remaining -= 1;
                still_pending.push(pending);
            }
        }
        state.pending = still_pending;

        Ok(state.visible.get(&id).cloned().unwrap_or_default())
    }

    async fn record_event(
        &self,
        id: BatchId,
        event_type: u8,
        payload: &str,
    ) -> GatewayResult<LedgerReceipt> {
        let mut state = self.write_state()?;
        state.submissions += 1;
        state.ensure_connected()?;

        if let Some(reason) = state.next_rejection.take() {
            return Err(GatewayError::Rejected(reason));
        }
        if state.batch(id).is_none() {
            return Err(GatewayError::Rejected(format!(
                "execution reverted: batch {id} does not exist"
            )));
        }
        if EventType::try_from(event_type).is_err() {
            return Err(GatewayError::Rejected(format!(
                "execution reverted: invalid event type {event_type}"
            )));
        }

        let timestamp = state.next_timestamp(self.config.tick_secs);
        state.sequence += 1;
        let sequence = state.sequence;
        let tx_hash = tx_hash(sequence, id, event_type, payload);

        let record = LedgerEventRecord {
            batch_id: id,
            event_type,
            actor: self.config.signer.clone(),
            timestamp,
            data_ref: payload.to_string(),
            tx_hash,
        };

        if self.config.propagation_lag == 0 {
            state.publish(record);
        } else {
            state.pending.push(PendingEvent {
                record,
                reads_remaining: self.config.propagation_lag,
            });
        }

        debug!(batch = %id, event_type, sequence, tx = %tx_hash, "event accepted");
        Ok(LedgerReceipt {
            tx_hash,
            batch_id: id,
            sequence,
        })
    }

    async fn batch_count(&self) -> GatewayResult<u64> {
        let state = self.read_state()?;
        state.ensure_connected()?;
        Ok(state.batches.len() as u64)
    }
}

fn tx_hash(sequence: u64, id: BatchId, event_type: u8, payload: &str) -> TxHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"agtrace-tx-v1:");
    hasher.update(&sequence.to_le_bytes());
    hasher.update(&id.get().to_le_bytes());
    hasher.update(&[event_type]);
    hasher.update(payload.as_bytes());
    TxHash::from_hash(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(lag: u32) -> InMemoryGatewayConfig {
        InMemoryGatewayConfig {
            propagation_lag: lag,
            start_time: Some(1_700_000_000),
            ..InMemoryGatewayConfig::default()
        }
    }

    fn id(raw: u64) -> BatchId {
        BatchId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn reads_require_connection() {
        let gateway = InMemoryLedgerGateway::new(manual(0));
        gateway.create_batch("Cassava").unwrap();
        assert_eq!(
            gateway.get_batch(id(1)).await.unwrap_err(),
            GatewayError::Unavailable
        );

        gateway.connect().await.unwrap();
        assert!(gateway.is_connected());
        assert_eq!(gateway.get_batch(id(1)).await.unwrap().product_type, "Cassava");
    }

    #[tokio::test]
    async fn batches_get_sequential_ids() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        let a = gateway.create_batch("Maize").unwrap();
        let b = gateway.create_batch("Yam").unwrap();
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
        assert_eq!(gateway.batch_count().await.unwrap(), 2);
        assert_eq!(
            gateway.get_batch(id(3)).await.unwrap_err(),
            GatewayError::NotFound(id(3))
        );
    }

    #[tokio::test]
    async fn new_batch_has_empty_history() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Cocoa").unwrap();
        assert!(gateway.get_batch_history(id(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accepted_events_are_visible_without_lag() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Cocoa").unwrap();
        let receipt = gateway.record_event(id(1), 1, "{}").await.unwrap();
        assert_eq!(receipt.sequence, 1);

        let history = gateway.get_batch_history(id(1)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].event_type, 1);
        assert_eq!(history[0].actor, gateway.config().signer);
        assert_eq!(history[0].tx_hash, receipt.tx_hash);
    }

    #[tokio::test]
    async fn identical_submissions_get_distinct_transactions() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Cocoa").unwrap();
        let first = gateway.record_event(id(1), 1, "same").await.unwrap();
        let second = gateway.record_event(id(1), 1, "same").await.unwrap();
        assert_ne!(first.tx_hash, second.tx_hash);

        let history = gateway.get_batch_history(id(1)).await.unwrap();
        let hashes: Vec<TxHash> = history.iter().map(|r| r.tx_hash).collect();
        assert_eq!(hashes, vec![first.tx_hash, second.tx_hash]);
    }

    #[tokio::test]
    async fn late_events_are_ordered_by_timestamp() {
        let gateway = InMemoryLedgerGateway::connected(manual(1));
        gateway.create_batch("Cocoa").unwrap();
        let receipt = gateway.record_event(id(1), 1, "shipped").await.unwrap();
        gateway
            .append_record(id(1), 3, ActorId::new("0xlab"), "checked")
            .unwrap();

        let first_read = gateway.get_batch_history(id(1)).await.unwrap();
        assert_eq!(first_read.len(), 1);
        assert_eq!(first_read[0].data_ref, "checked");

        let history = gateway.get_batch_history(id(1)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tx_hash, receipt.tx_hash);
        assert_eq!(history[1].data_ref, "checked");
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn lag_hides_events_for_the_configured_reads() {
        let gateway = InMemoryLedgerGateway::connected(manual(2));
        gateway.create_batch("Cocoa").unwrap();
        gateway.record_event(id(1), 2, "p").await.unwrap();
        assert_eq!(gateway.pending_count(), 1);

        assert!(gateway.get_batch_history(id(1)).await.unwrap().is_empty());
        assert!(gateway.get_batch_history(id(1)).await.unwrap().is_empty());
        assert_eq!(gateway.get_batch_history(id(1)).await.unwrap().len(), 1);
        assert_eq!(gateway.pending_count(), 0);
    }

    #[tokio::test]
    async fn lag_is_tracked_per_batch() {
        let gateway = InMemoryLedgerGateway::connected(manual(1));
        gateway.create_batch("A").unwrap();
        gateway.create_batch("B").unwrap();
        gateway.record_event(id(1), 1, "a").await.unwrap();

        // Reading batch 2 does not age batch 1's pending event.
        gateway.get_batch_history(id(2)).await.unwrap();
        gateway.get_batch_history(id(2)).await.unwrap();
        assert!(gateway.get_batch_history(id(1)).await.unwrap().is_empty());
        assert_eq!(gateway.get_batch_history(id(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timestamps_are_non_decreasing() {
        let gateway = InMemoryLedgerGateway::connected(InMemoryGatewayConfig::default());
        gateway.create_batch("Rice").unwrap();
        for _ in 0..5 {
            gateway.record_event(id(1), 1, "x").await.unwrap();
        }
        let history = gateway.get_batch_history(id(1)).await.unwrap();
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn manual_clock_ticks() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        let batch = gateway.create_batch("Rice").unwrap();
        assert_eq!(batch.created_at.as_secs(), 1_700_000_000);
        gateway.record_event(id(1), 1, "x").await.unwrap();
        let history = gateway.get_batch_history(id(1)).await.unwrap();
        assert_eq!(history[0].timestamp.as_secs(), 1_700_000_060);
    }

    #[tokio::test]
    async fn submissions_to_missing_batches_revert() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        let err = gateway.record_event(id(9), 1, "x").await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(reason) if reason.contains("does not exist")));
        assert_eq!(gateway.submission_count(), 1);
    }

    #[tokio::test]
    async fn invalid_codes_revert() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Rice").unwrap();
        let err = gateway.record_event(id(1), 9, "x").await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn injected_rejection_applies_once() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Rice").unwrap();
        gateway.reject_next_submission("insufficient funds for gas");
        let err = gateway.record_event(id(1), 1, "x").await.unwrap_err();
        assert_eq!(err, GatewayError::Rejected("insufficient funds for gas".into()));
        assert!(gateway.record_event(id(1), 1, "x").await.is_ok());
    }

    #[tokio::test]
    async fn history_failure_is_a_transport_error() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Rice").unwrap();
        gateway.set_history_failure(Some("rpc timeout"));
        assert_eq!(
            gateway.get_batch_history(id(1)).await.unwrap_err(),
            GatewayError::Transport("rpc timeout".into())
        );
        gateway.set_history_failure(None);
        assert!(gateway.get_batch_history(id(1)).await.is_ok());
    }

    #[tokio::test]
    async fn append_record_is_immediately_visible() {
        let gateway = InMemoryLedgerGateway::connected(manual(3));
        gateway.create_batch("Rice").unwrap();
        gateway
            .append_record(id(1), 0, ActorId::new("0xfarm"), "harvested")
            .unwrap();
        let history = gateway.get_batch_history(id(1)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].data_ref, "harvested");
        assert_eq!(gateway.submission_count(), 0);
    }

    #[tokio::test]
    async fn disconnect_blocks_writes() {
        let gateway = InMemoryLedgerGateway::connected(manual(0));
        gateway.create_batch("Rice").unwrap();
        gateway.disconnect();
        assert_eq!(
            gateway.record_event(id(1), 1, "x").await.unwrap_err(),
            GatewayError::Unavailable
        );
    }
}
