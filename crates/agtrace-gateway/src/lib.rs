//! Ledger gateway and identity contracts for agtrace.
//!
//! The ledger itself (connectivity, signing, consensus) and the session layer
//! that knows who the caller is both live outside agtrace. This crate defines
//! the minimal contracts the traceability core needs from them:
//!
//! - [`LedgerGateway`]: read batches and histories, submit events
//! - [`IdentityProvider`]: who is calling, and with which role
//!
//! It also provides [`InMemoryLedgerGateway`] and [`StaticIdentity`] for
//! tests, local demos, and embedding. The in-memory gateway models the one
//! ledger behaviour callers must cope with: an accepted write may not show up
//! in the very next read.

pub mod error;
pub mod identity;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{GatewayError, GatewayResult};
pub use identity::StaticIdentity;
pub use memory::{InMemoryGatewayConfig, InMemoryLedgerGateway};
pub use records::{LedgerEventRecord, LedgerReceipt, TxHash};
pub use traits::{IdentityProvider, LedgerGateway};
