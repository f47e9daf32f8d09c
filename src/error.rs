//! Error types for reel-search

use thiserror::Error;

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network errors
    FetchError,

    // User errors
    EmptyQuery,
    InvalidConfig,
    MissingApiKey,

    // Storage errors
    StorageCorruption,
    FileError,
}

/// Main error type for reel-search
#[derive(Error, Debug)]
pub enum ReelError {
    /// Transport failure or an API response with `Response: "False"`
    #[error("{0}")]
    Fetch(String),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Stored favorites are unreadable: {0}")]
    StorageCorruption(String),

    #[error("No OMDb API key configured. Set OMDB_API_KEY or run with --edit.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch(_) | Self::Http(_) => ErrorCode::FetchError,
            Self::EmptyQuery => ErrorCode::EmptyQuery,
            Self::StorageCorruption(_) => ErrorCode::StorageCorruption,
            Self::MissingApiKey => ErrorCode::MissingApiKey,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::File(_) => ErrorCode::FileError,
            // Only the OMDb boundary decodes JSON off the wire
            Self::Json(_) => ErrorCode::FetchError,
        }
    }

    pub fn is_fetch_error(&self) -> bool {
        self.code() == ErrorCode::FetchError
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
