use thiserror::Error;

use agtrace_gateway::GatewayError;
use agtrace_types::{BatchId, EventType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("batch {0} not found")]
    NotFound(BatchId),

    #[error("ledger gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("{caller} is not permitted to record {event_type} events")]
    Unauthorized {
        caller: String,
        event_type: EventType,
    },

    #[error("event submission failed: {0}")]
    SubmissionFailed(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("payload error: {0}")]
    Payload(#[from] agtrace_payload::PayloadError),
}

impl ServiceError {
    /// Map a gateway failure that happened while reading.
    pub fn from_read(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(id) => Self::NotFound(id),
            GatewayError::Unavailable => Self::GatewayUnavailable(err.to_string()),
            GatewayError::Rejected(reason) | GatewayError::Transport(reason) => {
                Self::GatewayUnavailable(reason)
            }
        }
    }

    /// Map a gateway failure that happened while submitting.
    pub fn from_write(err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable => Self::GatewayUnavailable(err.to_string()),
            other => Self::SubmissionFailed(other.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
