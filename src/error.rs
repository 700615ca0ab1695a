//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! Loader failures never leave the loader boundary; these errors are what
//! the boundary converts into empty results.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP errors (DNS, TLS, connection reset)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Resource answered with a non-success status
    #[error("Resource {resource} returned HTTP {status}")]
    Status { resource: String, status: u16 },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl DashboardError {
    /// Whether the resource simply is not there (yet)
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::Status { status: 404, .. })
    }
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}
