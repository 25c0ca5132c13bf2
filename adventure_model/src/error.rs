use thiserror::Error;

/// Errors raised while reading or writing adventure data.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("adventure document is malformed: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
