//! Event payload builder for agtrace.
//!
//! Turns the fields of an event form into the canonical off-chain payload
//! that travels with an on-ledger event record. Serialization is
//! deterministic: identical inputs always produce byte-identical output.
//! Fields that are absent or blank are left out entirely, so "not provided"
//! and "explicitly empty" never look alike downstream.

pub mod builder;
pub mod digest;
pub mod error;

pub use builder::{EventPayload, EventPayloadBuilder, PayloadFields};
pub use digest::{PayloadDigest, PayloadHasher};
pub use error::PayloadError;
