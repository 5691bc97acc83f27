/// Errors from payload construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
