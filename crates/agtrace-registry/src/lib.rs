//! Event type registry for agtrace.
//!
//! The registry is the single source of truth for role eligibility: the UI
//! layer uses it to decide which event kinds to offer, and the traceability
//! service uses the very same table to refuse submissions from callers who
//! bypass the form.
//!
//! # Quick Start
//!
//! ```rust
//! use agtrace_registry::EventTypeRegistry;
//! use agtrace_types::{EventType, Role};
//!
//! let registry = EventTypeRegistry::new();
//! let offered: Vec<_> = registry
//!     .eligible_event_types(Some(Role::Processor))
//!     .into_iter()
//!     .map(|opt| opt.event_type)
//!     .collect();
//! assert_eq!(offered, vec![EventType::Processing, EventType::QualityCheck]);
//! ```

pub mod registry;
pub mod table;

pub use registry::{EventTypeOption, EventTypeRegistry};
pub use table::{EligibilityRule, ELIGIBILITY};
