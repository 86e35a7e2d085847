//! Repository client error types.

/// Errors that can occur while talking to the remote task collection.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Precondition failed before any request was made
    #[error("{0}")]
    Validation(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote collection answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Failed to deserialize the response body
    #[error("Failed to deserialize API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Remote collection accepted a draft but returned no identifier
    #[error("Created task is missing an identifier")]
    MissingIdentifier,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
