use serde::Serialize;

use agtrace_types::SupplyChainEvent;

use crate::format::format_timestamp;

/// Shown in place of an empty data reference.
pub const NO_DATA: &str = "No additional data";

/// One row of a batch timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineEntry<'a> {
    pub event: &'a SupplyChainEvent,
    /// Zero-based position in the history.
    pub position: usize,
    /// Set on the final entry only.
    pub is_latest: bool,
    pub display_timestamp: String,
    pub label: &'static str,
    pub actor_display: String,
    pub data_display: String,
}

/// Turn an ordered history into timeline rows.
///
/// Output has the input's length and order. The input is never reordered:
/// the ledger's order is the timeline's order.
pub fn present(events: &[SupplyChainEvent]) -> Vec<TimelineEntry<'_>> {
    let last = events.len().checked_sub(1);
    events
        .iter()
        .enumerate()
        .map(|(position, event)| TimelineEntry {
            event,
            position,
            is_latest: Some(position) == last,
            display_timestamp: format_timestamp(event.timestamp),
            label: event.event_type.label(),
            actor_display: event.actor.short(),
            data_display: if event.data_ref.trim().is_empty() {
                NO_DATA.to_string()
            } else {
                event.data_ref.clone()
            },
        })
        .collect()
}
