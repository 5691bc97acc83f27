//! Batch traceability service for agtrace.
//!
//! The façade rendering layers call. It owns the request/response contract
//! against the [`agtrace_gateway::LedgerGateway`], re-checks role eligibility
//! on every submission, and reports whether an accepted event was already
//! visible when the receipt was produced.

pub mod config;
pub mod error;
pub mod form;
pub mod receipt;
pub mod service;
pub mod view;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use form::EventForm;
pub use receipt::{PropagationStatus, SubmissionReceipt};
pub use service::BatchTraceabilityService;
pub use view::{BatchView, HistoryState};

// Re-export key types
pub use agtrace_payload::{EventPayload, EventPayloadBuilder};
pub use agtrace_registry::EventTypeOption;
pub use agtrace_types::{Actor, ActorId, Batch, BatchId, EventType, Role, SupplyChainEvent};
