//! Certificate Transparency extensions on X.509 certificates

use crate::error::{Error, Result};
use ct_codec::constants::{
    AUTHORITY_KEY_IDENTIFIER_OID, POISON_EXTENSION_OID, PRECERTIFICATE_SIGNING_OID,
    SCT_CERTIFICATE_OID,
};
use ct_codec::SignedCertificateTimestamp;
use der::asn1::OctetString;
use der::{Decode, Encode};
use x509_cert::ext::pkix::ExtendedKeyUsage;
use x509_cert::ext::Extension;
use x509_cert::Certificate;

/// Parse a DER certificate
pub fn parse_certificate(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der)
        .map_err(|e| Error::Certificate(format!("failed to parse certificate: {}", e)))
}

pub fn find_extension<'a>(
    cert: &'a Certificate,
    oid: &const_oid::ObjectIdentifier,
) -> Option<&'a Extension> {
    cert.tbs_certificate
        .extensions
        .as_ref()?
        .iter()
        .find(|ext| ext.extn_id == *oid)
}

/// Whether the certificate carries the precertificate poison extension
pub fn is_precertificate(cert: &Certificate) -> bool {
    find_extension(cert, &POISON_EXTENSION_OID).is_some()
}

/// Whether the certificate carries an embedded SCT list
pub fn has_embedded_scts(cert: &Certificate) -> bool {
    find_extension(cert, &SCT_CERTIFICATE_OID).is_some()
}

/// Whether the certificate's extended key usage marks it as a precertificate signing certificate
pub fn is_precertificate_signing_cert(cert: &Certificate) -> Result<bool> {
    let Some(ext) = find_extension(cert, &const_oid::db::rfc5280::ID_CE_EXT_KEY_USAGE) else {
        return Ok(false);
    };
    let eku = ExtendedKeyUsage::from_der(ext.extn_value.as_bytes())?;
    Ok(eku.0.iter().any(|oid| *oid == PRECERTIFICATE_SIGNING_OID))
}

/// The authority key identifier extension, verbatim
pub fn authority_key_identifier(cert: &Certificate) -> Option<&Extension> {
    find_extension(cert, &AUTHORITY_KEY_IDENTIFIER_OID)
}

/// The SCTs embedded in the certificate, or `None` when it has no SCT list
///
/// The extension value is a DER OCTET STRING wrapping the TLS-encoded
/// `SignedCertificateTimestampList`.
pub fn embedded_scts(cert: &Certificate) -> Result<Option<Vec<SignedCertificateTimestamp>>> {
    let Some(ext) = find_extension(cert, &SCT_CERTIFICATE_OID) else {
        return Ok(None);
    };
    let list = OctetString::from_der(ext.extn_value.as_bytes())?;
    let scts = ct_codec::decode_sct_list(list.as_bytes())?;
    Ok(Some(scts))
}

/// DER encoding of the certificate's SubjectPublicKeyInfo
pub fn subject_public_key_info_der(cert: &Certificate) -> Result<Vec<u8>> {
    Ok(cert.tbs_certificate.subject_public_key_info.to_der()?)
}

/// SHA-256 of the certificate's DER SubjectPublicKeyInfo
pub fn key_hash(cert: &Certificate) -> Result<[u8; 32]> {
    Ok(ct_crypto::sha256(&subject_public_key_info_der(cert)?))
}
