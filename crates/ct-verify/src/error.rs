//! Error types for SCT verification

use thiserror::Error;

/// Errors that can occur while verifying SCTs or configuring a verifier
///
/// These are hard errors. Outcomes such as "signature does not verify" or
/// "too few SCTs" are returned as data in [`crate::VerificationResult`].
#[derive(Error, Debug)]
pub enum Error {
    /// The presented chain cannot support the requested verification
    #[error("invalid certificate chain: {0}")]
    ChainShape(String),

    /// TBS reconstruction needs a v3 certificate
    #[error("certificate version {0} is too low, expected v3")]
    VersionTooLow(u8),

    /// Log key type or SCT algorithm we cannot verify
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// SCT was checked against the wrong log
    #[error("log id of SCT ({sct}) does not match this log's id ({log})")]
    LogIdMismatch { sct: String, log: String },

    /// The precertificate needs its AKID replaced but the issuer has none
    #[error("issuer information has no authority key identifier to substitute")]
    MissingAuthorityKeyIdentifier,

    /// Certificate parsing or encoding error
    #[error("certificate error: {0}")]
    Certificate(String),

    /// SCT decoding error
    #[error("codec error: {0}")]
    Codec(#[from] ct_codec::Error),

    /// Signed data could not be serialized
    #[error("failed to serialize signed data: {0}")]
    Serialization(String),

    /// Cryptographic error other than a failed signature check
    #[error("crypto error: {0}")]
    Crypto(#[from] ct_crypto::Error),

    /// Log server error
    #[error("log list error: {0}")]
    LogList(#[from] ct_log_list::Error),

    /// Host pattern is not a well-formed hostname
    #[error("invalid host pattern: {0}")]
    InvalidHostPattern(String),

    /// A verifier must be enabled for at least one host
    #[error("at least one include host is required to enable certificate transparency verification")]
    NoIncludeHosts,

    /// No trusted path could be built from the presented chain
    #[error("failed to clean certificate chain: {0}")]
    ChainCleaning(String),

    /// Verifier built without a log list provider
    #[error("a log list provider is required")]
    MissingLogListProvider,
}

impl From<der::Error> for Error {
    fn from(e: der::Error) -> Self {
        Error::Certificate(e.to_string())
    }
}

impl From<tls_codec::Error> for Error {
    fn from(e: tls_codec::Error) -> Self {
        Error::Serialization(format!("{:?}", e))
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
