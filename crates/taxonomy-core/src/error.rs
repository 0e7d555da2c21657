use thiserror::Error;

/// Failure to turn an external payload into a concept record.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is missing a uuid")]
    MissingUuid,
}
