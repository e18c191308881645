//! `SignedCertificateTimestampList` (RFC 6962 section 3.3)
//!
//! This is the TLS structure carried inside the OCTET STRING of the
//! embedded-SCT X.509 extension and in the TLS `signed_certificate_timestamp`
//! extension.

use crate::codec::{Deserializer, Serializer};
use crate::constants::{MAX_SCT_LIST_LENGTH, MAX_SERIALIZED_SCT_LENGTH};
use crate::error::Result;
use crate::model::SignedCertificateTimestamp;

/// Decode every SCT in a serialized list
pub fn decode_sct_list(bytes: &[u8]) -> Result<Vec<SignedCertificateTimestamp>> {
    let mut outer = Deserializer::new(bytes);
    let list = outer.read_variable_length(MAX_SCT_LIST_LENGTH)?;
    outer.finish()?;

    let mut input = Deserializer::new(list);
    let mut scts = Vec::new();
    while !input.is_empty() {
        let serialized = input.read_variable_length(MAX_SERIALIZED_SCT_LENGTH)?;
        scts.push(SignedCertificateTimestamp::decode(serialized)?);
    }
    Ok(scts)
}

/// Serialize SCTs into a list
pub fn encode_sct_list(scts: &[SignedCertificateTimestamp]) -> Result<Vec<u8>> {
    let mut list = Serializer::new();
    for sct in scts {
        list.write_variable_length(&sct.encode()?, MAX_SERIALIZED_SCT_LENGTH)?;
    }
    let mut out = Serializer::new();
    out.write_variable_length(list.as_bytes(), MAX_SCT_LIST_LENGTH)?;
    Ok(out.into_bytes())
}
