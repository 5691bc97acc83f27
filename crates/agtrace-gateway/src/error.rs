use agtrace_types::BatchId;

/// Errors reported by a ledger gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("ledger connection has not been established")]
    Unavailable,

    #[error("batch {0} not found on the ledger")]
    NotFound(BatchId),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
