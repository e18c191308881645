//! Reconstruction of the TBSCertificate a log signed for a precertificate
//!
//! A log signs the precertificate's TBSCertificate with the poison extension
//! removed. When verifying an SCT embedded in a final certificate the same
//! bytes are rebuilt from the final certificate: the SCT list extension is
//! dropped as well, and if the precertificate was issued by a precertificate
//! signing certificate the issuer name and authority key identifier are
//! swapped back to those of the real CA.
//!
//! Extensions are re-emitted in their encoded order. The signed bytes depend
//! on that order, so no extension is ever sorted or re-canonicalised.

use crate::certificate::{authority_key_identifier, key_hash};
use crate::error::{Error, Result};
use ct_codec::constants::{
    AUTHORITY_KEY_IDENTIFIER_OID, POISON_EXTENSION_OID, SCT_CERTIFICATE_OID,
};
use der::Encode;
use x509_cert::certificate::Version;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::Certificate;

/// What the reconstruction needs to know about the certificate's issuer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerInformation {
    /// Issuer name to write into the TBSCertificate, when it differs from the leaf's
    pub name: Option<Name>,
    /// SHA-256 of the real issuer's DER SubjectPublicKeyInfo
    pub key_hash: [u8; 32],
    /// Authority key identifier extension to substitute into the leaf
    pub authority_key_identifier: Option<Extension>,
    pub issued_by_precert_signing_cert: bool,
}

impl IssuerInformation {
    /// The precertificate was signed directly by `issuer`
    ///
    /// Only the key hash is needed; the leaf already names the right issuer.
    pub fn from_issuer(issuer: &Certificate) -> Result<Self> {
        Ok(Self {
            name: None,
            key_hash: key_hash(issuer)?,
            authority_key_identifier: None,
            issued_by_precert_signing_cert: false,
        })
    }

    /// The precertificate was signed by `signing_cert`, a precertificate
    /// signing certificate acting for `issuer`
    pub fn from_precert_signing_cert(
        signing_cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Self> {
        Ok(Self {
            name: Some(signing_cert.tbs_certificate.issuer.clone()),
            key_hash: key_hash(issuer)?,
            authority_key_identifier: authority_key_identifier(signing_cert).cloned(),
            issued_by_precert_signing_cert: true,
        })
    }
}

fn version_number(version: Version) -> u8 {
    match version {
        Version::V1 => 1,
        Version::V2 => 2,
        Version::V3 => 3,
    }
}

/// Rebuild the DER TBSCertificate the log signed for `cert`
pub fn reconstruct_tbs(cert: &Certificate, issuer: &IssuerInformation) -> Result<Vec<u8>> {
    let mut tbs = cert.tbs_certificate.clone();

    if tbs.version != Version::V3 {
        return Err(Error::VersionTooLow(version_number(tbs.version)));
    }

    if let Some(extensions) = tbs.extensions.take() {
        let has_akid = extensions
            .iter()
            .any(|ext| ext.extn_id == AUTHORITY_KEY_IDENTIFIER_OID);
        if has_akid
            && issuer.issued_by_precert_signing_cert
            && issuer.authority_key_identifier.is_none()
        {
            return Err(Error::MissingAuthorityKeyIdentifier);
        }

        let filtered = extensions
            .into_iter()
            .filter(|ext| {
                ext.extn_id != POISON_EXTENSION_OID && ext.extn_id != SCT_CERTIFICATE_OID
            })
            .map(|ext| match &issuer.authority_key_identifier {
                Some(replacement) if ext.extn_id == AUTHORITY_KEY_IDENTIFIER_OID => {
                    replacement.clone()
                }
                _ => ext,
            })
            .collect();
        tbs.extensions = Some(filtered);
    }

    if let Some(name) = &issuer.name {
        tbs.issuer = name.clone();
    }

    tracing::trace!(
        serial = %hex::encode(tbs.serial_number.as_bytes()),
        "Reconstructed precertificate TBSCertificate"
    );

    Ok(tbs.to_der()?)
}
