//! Error types for ct-codec

use thiserror::Error;

/// Errors that can occur while encoding or decoding RFC 6962 structures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input ended before the structure was complete
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Version byte is not a known CT version
    #[error("Unknown version: {0}")]
    UnknownVersion(u64),

    /// Log entry type is neither x509_entry nor precert_entry
    #[error("Unknown log entry type: {0}")]
    UnknownLogEntryType(u64),

    /// Merkle leaf type is not timestamped_entry
    #[error("Unknown Merkle leaf type: {0}")]
    UnknownMerkleLeafType(u64),

    /// Hash algorithm byte is outside the TLS HashAlgorithm enum
    #[error("Unknown hash algorithm: 0x{0:02x}")]
    UnknownHashAlgorithm(u8),

    /// Signature algorithm byte is outside the TLS SignatureAlgorithm enum
    #[error("Unknown signature algorithm: 0x{0:02x}")]
    UnknownSignatureAlgorithm(u8),

    /// A length prefix exceeds the maximum declared for the field
    #[error("Malformed length: {length} exceeds maximum {max}")]
    MalformedLength { length: usize, max: usize },

    /// A value does not fit in the requested number of bytes
    #[error("Value {value} does not fit in {width} bytes")]
    ValueTooLarge { value: u64, width: usize },

    /// Bytes remained after a complete structure was decoded
    #[error("{0} trailing bytes after structure")]
    TrailingData(usize),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;
