//! Error types for log list operations

use thiserror::Error;

/// Errors that can occur while loading or providing log servers
#[derive(Debug, Error)]
pub enum Error {
    /// JSON parsing error
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error
    #[error("failed to decode base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Reading a log list from disk failed
    #[error("failed to read log list: {0}")]
    Io(#[from] std::io::Error),

    /// A log's key is not a DER SubjectPublicKeyInfo
    #[error("invalid log server key {key}: {reason}")]
    InvalidLogServerKey { key: String, reason: String },

    /// The published log id is not the hash of the published key
    #[error("log id mismatch: list says {expected}, key hashes to {actual}")]
    LogIdMismatch { expected: String, actual: String },

    /// The list contains no usable logs
    #[error("no usable log servers")]
    NoLogServers,

    /// State timestamp could not be parsed
    #[error("failed to parse time: {0}")]
    TimeParse(String),

    /// The underlying provider failed; shared with every caller of a single fetch
    #[error("log list fetch failed: {0}")]
    Fetch(String),
}

/// Result type for log list operations
pub type Result<T> = std::result::Result<T, Error>;
