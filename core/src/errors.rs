use thiserror::Error;
use crate::types::BookmarkId;

/// Input validation errors raised before anything is fetched or stored
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid URL: {url} ({reason})")]
    InvalidUrl { url: String, reason: String },

    #[error("Already in DB: {url}")]
    AlreadyExists { url: String },
}

/// Page fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unsupported URL scheme: {url}")]
    InvalidScheme { url: String },

    #[error("Request to {url} failed: {details}")]
    Transport { url: String, details: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Content too large for {url}: {size} bytes > {limit} bytes")]
    ContentTooLarge { url: String, size: u64, limit: u64 },

    #[error("Failed to read response body from {url}: {details}")]
    Body { url: String, details: String },
}

/// Storage errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Bookmark not found: {id}")]
    NotFound { id: BookmarkId },

    #[error("Duplicate URL: {url}")]
    DuplicateUrl { url: String },

    #[error("Database error: {details}")]
    Database { details: String },
}

/// General system errors
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {details}")]
    Configuration { details: String },

    #[error("IO error: {source}")]
    IO {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Main error type for the application
#[derive(Debug, Error)]
pub enum BookmarkManagerError {
    #[error("Validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Fetch error: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },

    #[error("Persistence error: {source}")]
    Persistence {
        #[from]
        source: PersistenceError,
    },

    #[error("System error: {source}")]
    System {
        #[from]
        source: SystemError,
    },
}

impl BookmarkManagerError {
    /// Message shown to the operator, without the category prefix
    pub fn violation_message(&self) -> String {
        match self {
            Self::Validation { source } => source.to_string(),
            Self::Fetch { source } => source.to_string(),
            Self::Persistence { source } => source.to_string(),
            Self::System { source } => source.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BookmarkManagerError>;
