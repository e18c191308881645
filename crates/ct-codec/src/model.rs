//! RFC 6962 data structures and their binary encoding

use crate::codec::{Deserializer, Serializer};
use crate::constants::{
    HASH_ALGORITHM_LENGTH, ISSUER_KEY_HASH_LENGTH, KEY_ID_LENGTH, LOG_ENTRY_TYPE_LENGTH,
    MAX_CERTIFICATE_LENGTH, MAX_EXTENSIONS_LENGTH, MAX_PRECERT_TBS_LENGTH, MAX_SIGNATURE_LENGTH,
    SIGNATURE_ALGORITHM_LENGTH, TIMESTAMP_LENGTH, VERSION_LENGTH,
};
use crate::error::{Error, Result};
use base64::Engine;

/// `MerkleLeafType.timestamped_entry`
const TIMESTAMPED_ENTRY_LEAF_TYPE: u64 = 0;

/// Width of the MerkleLeafType field
const MERKLE_LEAF_TYPE_LENGTH: usize = 1;

/// CT protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// v1 (0)
    V1,
}

impl Version {
    /// The wire value of this version
    pub fn number(self) -> u64 {
        match self {
            Version::V1 => 0,
        }
    }

    /// Map a wire value to a version
    pub fn from_number(number: u64) -> Result<Self> {
        match number {
            0 => Ok(Version::V1),
            other => Err(Error::UnknownVersion(other)),
        }
    }
}

/// Identifier of a log: the SHA-256 hash of its DER-encoded public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogId([u8; KEY_ID_LENGTH]);

impl LogId {
    /// Wrap raw log id bytes
    pub fn new(bytes: [u8; KEY_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The raw 32 bytes
    pub fn as_bytes(&self) -> &[u8; KEY_ID_LENGTH] {
        &self.0
    }

    /// Standard base64 of the id, the form used to key per-log results
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }
}

impl From<[u8; KEY_ID_LENGTH]> for LogId {
    fn from(bytes: [u8; KEY_ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

/// TLS `HashAlgorithm` (RFC 5246 7.4.1.4.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HashAlgorithm {
    None = 0,
    Md5 = 1,
    Sha1 = 2,
    Sha224 = 3,
    Sha256 = 4,
    Sha384 = 5,
    Sha512 = 6,
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => HashAlgorithm::None,
            1 => HashAlgorithm::Md5,
            2 => HashAlgorithm::Sha1,
            3 => HashAlgorithm::Sha224,
            4 => HashAlgorithm::Sha256,
            5 => HashAlgorithm::Sha384,
            6 => HashAlgorithm::Sha512,
            other => return Err(Error::UnknownHashAlgorithm(other)),
        })
    }
}

/// TLS `SignatureAlgorithm` (RFC 5246 7.4.1.4.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignatureAlgorithm {
    Anonymous = 0,
    Rsa = 1,
    Dsa = 2,
    Ecdsa = 3,
}

impl TryFrom<u8> for SignatureAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => SignatureAlgorithm::Anonymous,
            1 => SignatureAlgorithm::Rsa,
            2 => SignatureAlgorithm::Dsa,
            3 => SignatureAlgorithm::Ecdsa,
            other => return Err(Error::UnknownSignatureAlgorithm(other)),
        })
    }
}

/// A signature together with the algorithms that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitallySigned {
    pub hash_algorithm: HashAlgorithm,
    pub signature_algorithm: SignatureAlgorithm,
    pub signature: Vec<u8>,
}

impl DigitallySigned {
    pub fn write_to(&self, out: &mut Serializer) -> Result<()> {
        out.write_uint(self.hash_algorithm as u64, HASH_ALGORITHM_LENGTH)?;
        out.write_uint(self.signature_algorithm as u64, SIGNATURE_ALGORITHM_LENGTH)?;
        out.write_variable_length(&self.signature, MAX_SIGNATURE_LENGTH)
    }

    pub fn read_from(input: &mut Deserializer<'_>) -> Result<Self> {
        let hash_algorithm = HashAlgorithm::try_from(input.read_uint(HASH_ALGORITHM_LENGTH)? as u8)?;
        let signature_algorithm =
            SignatureAlgorithm::try_from(input.read_uint(SIGNATURE_ALGORITHM_LENGTH)? as u8)?;
        let signature = input.read_variable_length(MAX_SIGNATURE_LENGTH)?.to_vec();
        Ok(Self {
            hash_algorithm,
            signature_algorithm,
            signature,
        })
    }

    /// Encode to the TLS binary form
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Serializer::new();
        self.write_to(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode from the TLS binary form, rejecting trailing bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut input = Deserializer::new(bytes);
        let value = Self::read_from(&mut input)?;
        input.finish()?;
        Ok(value)
    }
}

/// A Signed Certificate Timestamp as returned by a log or embedded in a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCertificateTimestamp {
    pub version: Version,
    pub log_id: LogId,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub extensions: Vec<u8>,
    pub signature: DigitallySigned,
}

impl SignedCertificateTimestamp {
    pub fn write_to(&self, out: &mut Serializer) -> Result<()> {
        out.write_uint(self.version.number(), VERSION_LENGTH)?;
        out.write_fixed(self.log_id.as_bytes());
        out.write_uint(self.timestamp, TIMESTAMP_LENGTH)?;
        out.write_variable_length(&self.extensions, MAX_EXTENSIONS_LENGTH)?;
        self.signature.write_to(out)
    }

    pub fn read_from(input: &mut Deserializer<'_>) -> Result<Self> {
        let version = Version::from_number(input.read_uint(VERSION_LENGTH)?)?;
        let mut key_id = [0u8; KEY_ID_LENGTH];
        key_id.copy_from_slice(input.read_fixed(KEY_ID_LENGTH)?);
        let timestamp = input.read_uint(TIMESTAMP_LENGTH)?;
        let extensions = input.read_variable_length(MAX_EXTENSIONS_LENGTH)?.to_vec();
        let signature = DigitallySigned::read_from(input)?;
        Ok(Self {
            version,
            log_id: LogId::new(key_id),
            timestamp,
            extensions,
            signature,
        })
    }

    /// Encode to the TLS binary form
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Serializer::new();
        self.write_to(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode from the TLS binary form, rejecting trailing bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut input = Deserializer::new(bytes);
        let sct = Self::read_from(&mut input)?;
        input.finish()?;
        Ok(sct)
    }
}

/// `LogEntryType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LogEntryType {
    X509Entry = 0,
    PrecertEntry = 1,
}

impl LogEntryType {
    /// Map a wire value to an entry type
    pub fn from_number(number: u64) -> Result<Self> {
        match number {
            0 => Ok(LogEntryType::X509Entry),
            1 => Ok(LogEntryType::PrecertEntry),
            other => Err(Error::UnknownLogEntryType(other)),
        }
    }
}

/// `PreCert`: the issuer key hash and the TBSCertificate the log signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreCertificate {
    pub issuer_key_hash: [u8; ISSUER_KEY_HASH_LENGTH],
    pub tbs_certificate: Vec<u8>,
}

/// The entry inside a TimestampedEntry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedEntry {
    /// DER of a final certificate
    X509(Vec<u8>),
    PreCertificate(PreCertificate),
}

impl SignedEntry {
    pub fn entry_type(&self) -> LogEntryType {
        match self {
            SignedEntry::X509(_) => LogEntryType::X509Entry,
            SignedEntry::PreCertificate(_) => LogEntryType::PrecertEntry,
        }
    }
}

/// `TimestampedEntry`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedEntry {
    pub timestamp: u64,
    pub signed_entry: SignedEntry,
    pub extensions: Vec<u8>,
}

impl TimestampedEntry {
    pub fn write_to(&self, out: &mut Serializer) -> Result<()> {
        out.write_uint(self.timestamp, TIMESTAMP_LENGTH)?;
        out.write_uint(self.signed_entry.entry_type() as u64, LOG_ENTRY_TYPE_LENGTH)?;
        match &self.signed_entry {
            SignedEntry::X509(certificate) => {
                out.write_variable_length(certificate, MAX_CERTIFICATE_LENGTH)?;
            }
            SignedEntry::PreCertificate(precert) => {
                out.write_fixed(&precert.issuer_key_hash);
                out.write_variable_length(&precert.tbs_certificate, MAX_PRECERT_TBS_LENGTH)?;
            }
        }
        out.write_variable_length(&self.extensions, MAX_EXTENSIONS_LENGTH)
    }

    pub fn read_from(input: &mut Deserializer<'_>) -> Result<Self> {
        let timestamp = input.read_uint(TIMESTAMP_LENGTH)?;
        let entry_type = LogEntryType::from_number(input.read_uint(LOG_ENTRY_TYPE_LENGTH)?)?;
        let signed_entry = match entry_type {
            LogEntryType::X509Entry => {
                SignedEntry::X509(input.read_variable_length(MAX_CERTIFICATE_LENGTH)?.to_vec())
            }
            LogEntryType::PrecertEntry => {
                let mut issuer_key_hash = [0u8; ISSUER_KEY_HASH_LENGTH];
                issuer_key_hash.copy_from_slice(input.read_fixed(ISSUER_KEY_HASH_LENGTH)?);
                let tbs_certificate = input.read_variable_length(MAX_PRECERT_TBS_LENGTH)?.to_vec();
                SignedEntry::PreCertificate(PreCertificate {
                    issuer_key_hash,
                    tbs_certificate,
                })
            }
        };
        let extensions = input.read_variable_length(MAX_EXTENSIONS_LENGTH)?.to_vec();
        Ok(Self {
            timestamp,
            signed_entry,
            extensions,
        })
    }
}

/// `MerkleTreeLeaf`, the structure hashed into a log's tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTreeLeaf {
    pub version: Version,
    pub timestamped_entry: TimestampedEntry,
}

impl MerkleTreeLeaf {
    /// Encode to the TLS binary form
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Serializer::new();
        out.write_uint(self.version.number(), VERSION_LENGTH)?;
        out.write_uint(TIMESTAMPED_ENTRY_LEAF_TYPE, MERKLE_LEAF_TYPE_LENGTH)?;
        self.timestamped_entry.write_to(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode from the TLS binary form, rejecting trailing bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut input = Deserializer::new(bytes);
        let version = Version::from_number(input.read_uint(VERSION_LENGTH)?)?;
        let leaf_type = input.read_uint(MERKLE_LEAF_TYPE_LENGTH)?;
        if leaf_type != TIMESTAMPED_ENTRY_LEAF_TYPE {
            return Err(Error::UnknownMerkleLeafType(leaf_type));
        }
        let timestamped_entry = TimestampedEntry::read_from(&mut input)?;
        input.finish()?;
        Ok(Self {
            version,
            timestamped_entry,
        })
    }
}
