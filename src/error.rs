//! reelsearch error types

/// reelsearch error types
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    // Backend/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("movie not found: {0}")]
    NotFound(String),

    #[error("empty response from backend")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),

    // Session storage errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("storage quota exceeded: {size} bytes (quota: {quota})")]
    QuotaExceeded { size: usize, quota: usize },

    /// Even the reduced form of an entry did not fit under the size ceiling.
    #[error("cache entry too large: {size} bytes (limit: {limit})")]
    CacheTooLarge { size: usize, limit: usize },
}

impl From<std::io::Error> for ReelError {
    fn from(err: std::io::Error) -> Self {
        ReelError::Storage(err.to_string())
    }
}

impl ReelError {
    /// Whether this error came from the storage layer rather than the backend.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ReelError::Storage(_) | ReelError::QuotaExceeded { .. } | ReelError::CacheTooLarge { .. }
        )
    }
}

/// Result type alias for reelsearch operations
pub type Result<T> = std::result::Result<T, ReelError>;
