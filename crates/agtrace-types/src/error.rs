use thiserror::Error;

/// Errors produced by type construction and boundary conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid batch id: {0}")]
    InvalidBatchId(String),

    #[error("unknown event type code: {0}")]
    UnknownEventType(u8),

    #[error("quality score must be between 1 and 10, got {0}")]
    InvalidQualityScore(u8),
}
