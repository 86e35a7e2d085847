//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::repository::RepositoryError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote task collection errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Input rejected by validation rules
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// An action finished with an error recorded in the store
    #[error("{0}")]
    Action(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
