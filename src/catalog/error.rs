//! Catalog client error taxonomy
//!
//! Every client implementation maps its transport failures onto this enum so
//! the pipeline can report upstream failures uniformly. The pipeline never
//! retries; any retry policy belongs to the job runner.

use thiserror::Error;

/// Errors surfaced by catalog client operations
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// API request failed with the given message
    #[error("Catalog API error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded, retry after the specified duration (in seconds)
    #[error("Rate limit exceeded{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    /// Network-related error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded into the expected shape
    #[error("Invalid response from catalog: {0}")]
    InvalidResponse(String),

    /// The requested entry does not exist
    #[error("Entry not found: {0}")]
    NotFound(String),
}
