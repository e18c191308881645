//! RFC 6962 binary codec
//!
//! This crate encodes and decodes the Certificate Transparency wire structures
//! (`SignedCertificateTimestamp`, `DigitallySigned`, `MerkleTreeLeaf` and the
//! embedded SCT list) to and from their exact byte representation. Decoding
//! never panics: malformed input is reported through [`Error`].

pub mod codec;
pub mod constants;
pub mod error;
pub mod model;
pub mod sct_list;

pub use codec::{bytes_for_data_length, Deserializer, Serializer};
pub use error::{Error, Result};
pub use model::{
    DigitallySigned, HashAlgorithm, LogEntryType, LogId, MerkleTreeLeaf, PreCertificate,
    SignatureAlgorithm, SignedCertificateTimestamp, SignedEntry, TimestampedEntry, Version,
};
pub use sct_list::{decode_sct_list, encode_sct_list};
