use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use agtrace_gateway::{
    GatewayError, IdentityProvider, LedgerEventRecord, LedgerGateway, LedgerReceipt,
};
use agtrace_payload::EventPayload;
use agtrace_registry::{EventTypeOption, EventTypeRegistry};
use agtrace_types::{Actor, Batch, BatchId, EventType, SupplyChainEvent, TypeError};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::form::EventForm;
use crate::receipt::{PropagationStatus, SubmissionReceipt};
use crate::view::{BatchView, HistoryState};

/// Façade over the ledger gateway for reading and extending batch histories.
///
/// The service holds no state of its own beyond shared handles; every call
/// goes to the gateway. It never retries and never polls: a failed call
/// surfaces as is, and an accepted write that is not yet visible is reported
/// as [`PropagationStatus::PendingPropagation`].
pub struct BatchTraceabilityService {
    gateway: Arc<dyn LedgerGateway>,
    identity: Arc<dyn IdentityProvider>,
    registry: EventTypeRegistry,
    config: ServiceConfig,
}

impl BatchTraceabilityService {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        identity: Arc<dyn IdentityProvider>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            gateway,
            identity,
            registry: EventTypeRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &EventTypeRegistry {
        &self.registry
    }

    // ---- Connection ----

    /// Establish the ledger connection.
    pub async fn connect(&self) -> ServiceResult<()> {
        self.gateway
            .connect()
            .await
            .map_err(|e| ServiceError::GatewayUnavailable(e.to_string()))?;
        info!("ledger connection established");
        Ok(())
    }

    /// Connect first when configured to, otherwise leave connection handling
    /// to the caller and let the gateway report `Unavailable`.
    async fn prepare(&self) -> ServiceResult<()> {
        if self.config.auto_connect && !self.gateway.is_connected() {
            self.connect().await?;
        }
        Ok(())
    }

    // ---- Reads ----

    /// Fetch a batch descriptor.
    pub async fn get_batch(&self, batch_id: u64) -> ServiceResult<Batch> {
        let id = validate_batch_id(batch_id)?;
        self.prepare().await?;
        debug!(batch = %id, "fetching batch");
        self.gateway
            .get_batch(id)
            .await
            .map_err(ServiceError::from_read)
    }

    /// Fetch a batch's event history in ledger order.
    ///
    /// A batch with no recorded events yields an empty list.
    pub async fn get_history(&self, batch_id: u64) -> ServiceResult<Vec<SupplyChainEvent>> {
        let id = validate_batch_id(batch_id)?;
        self.prepare().await?;
        let records = self
            .gateway
            .get_batch_history(id)
            .await
            .map_err(ServiceError::from_read)?;
        debug!(batch = %id, count = records.len(), "fetched history");

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| to_event(index, record))
            .collect()
    }

    /// Load a batch and its history for display.
    ///
    /// A batch-level failure is returned as an error. A history-level failure
    /// keeps the loaded batch and marks the history unavailable.
    pub async fn load_view(&self, batch_id: u64) -> ServiceResult<BatchView> {
        let batch = self.get_batch(batch_id).await?;
        let history = match self.get_history(batch_id).await {
            Ok(events) => HistoryState::Loaded { events },
            Err(e) => {
                warn!(batch = %batch.id, error = %e, "history unavailable");
                HistoryState::Unavailable {
                    reason: e.to_string(),
                }
            }
        };
        Ok(BatchView { batch, history })
    }

    /// List batches by ascending id, up to `limit` (or the configured
    /// default). Ids the ledger reports as missing are skipped.
    pub async fn list_batches(&self, limit: Option<usize>) -> ServiceResult<Vec<Batch>> {
        self.prepare().await?;
        let limit = limit.unwrap_or(self.config.list_limit) as u64;
        let count = self
            .gateway
            .batch_count()
            .await
            .map_err(ServiceError::from_read)?;

        let mut batches = Vec::new();
        for raw in 1..=count.min(limit) {
            let id = BatchId::new(raw).map_err(|e| ServiceError::DataIntegrity(e.to_string()))?;
            match self.gateway.get_batch(id).await {
                Ok(batch) => batches.push(batch),
                Err(GatewayError::NotFound(_)) => {
                    warn!(batch = %id, "batch counted by ledger but not found; skipping");
                }
                Err(e) => return Err(ServiceError::from_read(e)),
            }
        }
        Ok(batches)
    }

    // ---- Authorization ----

    /// Event types the current caller may record.
    pub async fn eligible_event_types(&self) -> Vec<EventTypeOption> {
        let actor = self.identity.current_actor().await;
        self.registry
            .eligible_event_types(actor.as_ref().and_then(Actor::role))
    }

    // ---- Writes ----

    /// Submit an event for a batch.
    ///
    /// The caller's role is checked against the registry before anything is
    /// sent; an unauthorized caller never reaches the ledger. A returned
    /// receipt means the ledger accepted the write, not that the event is
    /// visible yet.
    pub async fn record_event(
        &self,
        batch_id: u64,
        event_type: EventType,
        payload: &EventPayload,
    ) -> ServiceResult<SubmissionReceipt> {
        let id = validate_batch_id(batch_id)?;
        if payload.event_type() != event_type {
            return Err(ServiceError::Validation(format!(
                "payload was built for {} but submitted as {event_type}",
                payload.event_type()
            )));
        }

        let actor = self.identity.current_actor().await;
        let role = actor.as_ref().and_then(Actor::role);
        if !self.registry.is_authorized(role, event_type) {
            let caller = describe_caller(actor.as_ref());
            warn!(batch = %id, %event_type, %caller, "unauthorized event submission");
            return Err(ServiceError::Unauthorized { caller, event_type });
        }

        self.prepare().await?;
        let ledger_receipt = self
            .gateway
            .record_event(id, event_type.code(), payload.as_str())
            .await
            .map_err(ServiceError::from_write)?;
        info!(
            batch = %id,
            %event_type,
            tx = %ledger_receipt.tx_hash,
            "event accepted by ledger"
        );

        let status = if self.config.confirm_after_submit {
            self.visibility(&ledger_receipt).await
        } else {
            PropagationStatus::PendingPropagation
        };

        Ok(SubmissionReceipt {
            submission_id: Uuid::now_v7(),
            batch_id: id,
            event_type,
            tx_hash: ledger_receipt.tx_hash,
            sequence: ledger_receipt.sequence,
            payload_digest: payload.digest(),
            status,
        })
    }

    /// Validate a form, build its payload for the current caller, and submit
    /// it.
    pub async fn submit_form(
        &self,
        batch_id: u64,
        form: EventForm,
    ) -> ServiceResult<SubmissionReceipt> {
        validate_batch_id(batch_id)?;
        let event_type = form.event_type;
        let Some(actor) = self.identity.current_actor().await else {
            return Err(ServiceError::Unauthorized {
                caller: describe_caller(None),
                event_type,
            });
        };
        let payload = form.into_builder(&actor)?.build()?;
        self.record_event(batch_id, event_type, &payload).await
    }

    /// One history read to see whether the transaction behind `receipt` has
    /// surfaced. Any failure counts as not yet visible.
    async fn visibility(&self, receipt: &LedgerReceipt) -> PropagationStatus {
        let id = receipt.batch_id;
        let records = match self.gateway.get_batch_history(id).await {
            Ok(records) => records,
            Err(e) => {
                debug!(batch = %id, error = %e, "post-submit history read failed");
                return PropagationStatus::PendingPropagation;
            }
        };

        if records.iter().any(|r| r.tx_hash == receipt.tx_hash) {
            PropagationStatus::Confirmed
        } else {
            debug!(batch = %id, tx = %receipt.tx_hash, "submitted event not yet visible");
            PropagationStatus::PendingPropagation
        }
    }
}

fn validate_batch_id(raw: u64) -> ServiceResult<BatchId> {
    BatchId::new(raw).map_err(|e| ServiceError::Validation(e.to_string()))
}

fn to_event(index: usize, record: LedgerEventRecord) -> ServiceResult<SupplyChainEvent> {
    let event_type = EventType::try_from(record.event_type).map_err(|e| match e {
        TypeError::UnknownEventType(code) => ServiceError::DataIntegrity(format!(
            "event {index} of batch {} has unknown type code {code}",
            record.batch_id
        )),
        other => ServiceError::DataIntegrity(other.to_string()),
    })?;
    Ok(SupplyChainEvent {
        batch_id: record.batch_id,
        event_type,
        actor: record.actor,
        timestamp: record.timestamp,
        data_ref: record.data_ref,
    })
}

fn describe_caller(actor: Option<&Actor>) -> String {
    match actor {
        None => "anonymous caller".into(),
        Some(a) => match a.role() {
            Some(role) => format!("role {role}"),
            None => format!("unregistered role code {}", a.role_code),
        },
    }
}
