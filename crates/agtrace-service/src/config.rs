use serde::{Deserialize, Serialize};

/// Configuration for [`crate::BatchTraceabilityService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Open the ledger connection on first use instead of failing with
    /// `GatewayUnavailable`.
    pub auto_connect: bool,
    /// After an accepted submission, read the history once and report whether
    /// the new event is already visible.
    pub confirm_after_submit: bool,
    /// Default number of batches returned by `list_batches`.
    pub list_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auto_connect: false,
            confirm_after_submit: true,
            list_limit: 20,
        }
    }
}
