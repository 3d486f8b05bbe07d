use thiserror::Error;

/// All the ways a crawl, export or load can go wrong
///
/// A failed package lookup is deliberately absent here: it never aborts a
/// run and lives in [`crate::lookup::LookupError`] instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Graph store rejected the load: {0}")]
    GraphStoreError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
