//! Foundation types for agtrace.
//!
//! Every other agtrace crate depends on `agtrace-types`. Integer codes for
//! event types and roles are only ever seen at the ledger/identity boundary;
//! everything past that boundary works with the closed enums below.
//!
//! # Key Types
//!
//! - [`BatchId`]: Positive, ledger-assigned batch identifier
//! - [`Batch`]: Immutable batch descriptor
//! - [`SupplyChainEvent`]: One append-only entry in a batch's history
//! - [`EventType`]: Closed set of event kinds
//! - [`Role`] / [`Actor`]: Caller identity as supplied by the identity layer
//! - [`EpochSeconds`]: Ledger timestamps

pub mod actor;
pub mod batch;
pub mod error;
pub mod event;
pub mod temporal;

pub use actor::{Actor, ActorId, Role};
pub use batch::{Batch, BatchId};
pub use error::TypeError;
pub use event::{EventType, QualityScore, SupplyChainEvent};
pub use temporal::EpochSeconds;
