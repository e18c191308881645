//! A single trusted CT log

use crate::error::{Error, Result};
use base64::Engine;
use ct_codec::LogId;
use der::Decode;
use spki::SubjectPublicKeyInfoOwned;

/// A CT log the verifier trusts, identified by the hash of its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogServer {
    id: LogId,
    public_key: Vec<u8>,
    /// SCTs issued after this time (ms since epoch) are untrusted; `None` means no end
    pub valid_until: Option<u64>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl LogServer {
    /// Create a log server from its DER-encoded SubjectPublicKeyInfo
    ///
    /// The log id is the SHA-256 hash of `public_key`.
    pub fn new(public_key: Vec<u8>, valid_until: Option<u64>) -> Result<Self> {
        if let Err(e) = SubjectPublicKeyInfoOwned::from_der(&public_key) {
            return Err(Error::InvalidLogServerKey {
                key: base64::engine::general_purpose::STANDARD.encode(&public_key),
                reason: e.to_string(),
            });
        }
        let id = LogId::new(ct_crypto::sha256(&public_key));
        Ok(Self {
            id,
            public_key,
            valid_until,
            description: None,
            url: None,
        })
    }

    /// Create a log server from a base64 DER key, as published in log lists
    pub fn from_base64_key(key: &str, valid_until: Option<u64>) -> Result<Self> {
        let der = base64::engine::general_purpose::STANDARD
            .decode(key.trim())
            .map_err(|e| Error::InvalidLogServerKey {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Self::new(der, valid_until)
    }

    /// Create a log server from a PEM `PUBLIC KEY` block
    pub fn from_pem(pem_str: &str, valid_until: Option<u64>) -> Result<Self> {
        let parsed = pem::parse(pem_str).map_err(|e| Error::InvalidLogServerKey {
            key: pem_str.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.tag() != "PUBLIC KEY" {
            return Err(Error::InvalidLogServerKey {
                key: pem_str.to_string(),
                reason: format!("expected PUBLIC KEY, got {}", parsed.tag()),
            });
        }
        Self::new(parsed.into_contents(), valid_until)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// SHA-256 of the DER public key
    pub fn id(&self) -> &LogId {
        &self.id
    }

    /// DER-encoded SubjectPublicKeyInfo
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Parsed SubjectPublicKeyInfo
    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        SubjectPublicKeyInfoOwned::from_der(&self.public_key).map_err(|e| {
            Error::InvalidLogServerKey {
                key: self.id.to_base64(),
                reason: e.to_string(),
            }
        })
    }

    /// Whether an SCT issued at `timestamp` falls inside this log's trusted window
    pub fn is_trusted_at(&self, timestamp: u64) -> bool {
        self.valid_until.map_or(true, |until| timestamp <= until)
    }
}

impl std::fmt::Display for LogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} ({})", description, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
