use serde::Serialize;

use agtrace_types::{Batch, SupplyChainEvent};

/// History half of a [`BatchView`].
///
/// The batch and its history are independent failure domains: a failed
/// history read leaves the batch displayable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryState {
    Loaded { events: Vec<SupplyChainEvent> },
    Unavailable { reason: String },
}

impl HistoryState {
    /// The loaded events, if the history read succeeded.
    pub fn events(&self) -> Option<&[SupplyChainEvent]> {
        match self {
            Self::Loaded { events } => Some(events),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Everything needed to render one batch page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchView {
    pub batch: Batch,
    pub history: HistoryState,
}
