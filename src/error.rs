//! Error type shared by the pipeline and its bindings.

#[derive(Debug, thiserror::Error)]
pub enum DehazeError {
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
    #[error("invalid pipeline parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

impl DehazeError {
    pub(crate) fn invalid_buffer(reason: impl Into<String>) -> Self {
        DehazeError::InvalidBuffer(reason.into())
    }
}
