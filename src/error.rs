use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("Invalid scoring configuration: {0}")]
    InvalidScoringConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatementError>;
