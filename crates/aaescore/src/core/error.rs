use thiserror::Error;

use crate::drive::{DriveError, IndexError};
use crate::search::QueryError;

/// Centralized error types for the application
///
/// Every component keeps its own typed error; this enum is what the operator
/// jobs (index sync, one-shot search) return to the bot and CLI layers.
///
/// # Example
///
/// ```no_run
/// use aaescore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote drive transport errors
    #[error("Drive error: {0}")]
    Drive(#[from] DriveError),

    /// Flat index persistence errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Rejected search input
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operator input or configuration rejected before any work started
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
