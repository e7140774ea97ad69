use thiserror::Error;

/// Transport-level failure talking to the remote drive.
///
/// Callers on the query path log these and degrade to "no results"; the
/// variants exist so logs can tell a timeout from a rejected request.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("drive returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid drive API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl DriveError {
    /// Maps reqwest failures, separating timeouts from other transport errors.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DriveError::Timeout
        } else {
            DriveError::Http(err)
        }
    }
}

/// Why a recursive walk was aborted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlattenError {
    #[error("folder {folder_id} is its own ancestor")]
    CycleDetected { folder_id: String },

    #[error("folder {folder_id} is nested deeper than {limit} levels")]
    DepthExceeded { folder_id: String, limit: usize },
}

/// Flat index persistence failure.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
