//! Verification of a log's signature over an SCT
//!
//! The log signs a `digitally-signed` struct (RFC 6962 section 3.2) binding the
//! SCT's timestamp and extensions to either the final certificate or the
//! precertificate's TBSCertificate. [`LogSignatureVerifier`] rebuilds that
//! struct from the presented chain and checks the signature with the log's
//! key.

use crate::certificate::{
    has_embedded_scts, is_precertificate, is_precertificate_signing_cert, parse_certificate,
};
use crate::error::{Error, Result};
use crate::tbs::{reconstruct_tbs, IssuerInformation};
use ct_codec::{HashAlgorithm, LogEntryType, SignatureAlgorithm, SignedCertificateTimestamp};
use ct_crypto::{SigningScheme, VerificationKey};
use ct_log_list::LogServer;
use rustls_pki_types::CertificateDer;
use tls_codec::{SerializeBytes, TlsByteVecU16, TlsByteVecU24, TlsSerializeBytes, TlsSize};
use x509_cert::Certificate;

/// Leading version byte of the signed struct
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u8)]
enum SctVersion {
    V1 = 0,
}

/// Discriminates SCT signatures from tree head signatures
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u8)]
enum SignatureType {
    CertificateTimestamp = 0,
    #[allow(unused)]
    TreeHash = 1,
}

/// Issuer key hash plus the TBSCertificate the log saw
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct PreCert {
    /// SHA-256 hash of the issuer's SubjectPublicKeyInfo
    issuer_key_hash: [u8; 32],
    /// The reconstructed TBSCertificate
    tbs_certificate: TlsByteVecU24,
}

/// The certificate or precertificate an SCT vouches for, tagged with its u16 entry type
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u16)]
enum SignedEntry {
    #[tls_codec(discriminant = "LogEntryType::X509Entry")]
    X509Entry(TlsByteVecU24),
    #[tls_codec(discriminant = "LogEntryType::PrecertEntry")]
    PrecertEntry(PreCert),
}

/// Bytes a log signs when issuing an SCT
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct SignedData {
    version: SctVersion,
    signature_type: SignatureType,
    timestamp: u64,
    signed_entry: SignedEntry,
    extensions: TlsByteVecU16,
}

impl SignedData {
    fn new(sct: &SignedCertificateTimestamp, signed_entry: SignedEntry) -> Self {
        Self {
            version: match sct.version {
                ct_codec::Version::V1 => SctVersion::V1,
            },
            signature_type: SignatureType::CertificateTimestamp,
            timestamp: sct.timestamp,
            signed_entry,
            extensions: sct.extensions.as_slice().into(),
        }
    }
}

/// Serialize the signed data for an SCT over a final certificate
pub fn x509_signed_data(
    sct: &SignedCertificateTimestamp,
    certificate_der: &[u8],
) -> Result<Vec<u8>> {
    let entry = SignedEntry::X509Entry(certificate_der.into());
    Ok(SignedData::new(sct, entry).tls_serialize()?)
}

/// Serialize the signed data for an SCT over a precertificate
pub fn precert_signed_data(
    sct: &SignedCertificateTimestamp,
    issuer_key_hash: [u8; 32],
    tbs_certificate_der: &[u8],
) -> Result<Vec<u8>> {
    let entry = SignedEntry::PrecertEntry(PreCert {
        issuer_key_hash,
        tbs_certificate: tbs_certificate_der.into(),
    });
    Ok(SignedData::new(sct, entry).tls_serialize()?)
}

/// Verifies SCT signatures made by a single log
#[derive(Debug, Clone, Copy)]
pub struct LogSignatureVerifier<'a> {
    log: &'a LogServer,
}

impl<'a> LogSignatureVerifier<'a> {
    pub fn new(log: &'a LogServer) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &'a LogServer {
        self.log
    }

    /// Verify an SCT over a final certificate submitted to the log as-is
    ///
    /// Returns `Ok(false)` only when the signature does not verify.
    pub fn verify(
        &self,
        sct: &SignedCertificateTimestamp,
        leaf: &CertificateDer<'_>,
    ) -> Result<bool> {
        self.check_log_id(sct)?;
        let signed_data = x509_signed_data(sct, leaf.as_ref())?;
        self.verify_signed_data(sct, &signed_data)
    }

    /// Verify an SCT against a presented chain, leaf first
    ///
    /// Handles a plain certificate, a precertificate signed by its CA, and a
    /// precertificate signed by a precertificate signing certificate (which
    /// must then be second in the chain with the real CA third). A final
    /// certificate carrying embedded SCTs is treated as its precertificate.
    pub fn verify_chain(
        &self,
        sct: &SignedCertificateTimestamp,
        chain: &[CertificateDer<'_>],
    ) -> Result<bool> {
        self.check_log_id(sct)?;

        let leaf_der = chain
            .first()
            .ok_or_else(|| Error::ChainShape("chain is empty".to_string()))?;
        let leaf = parse_certificate(leaf_der.as_ref())?;

        if !is_precertificate(&leaf) && !has_embedded_scts(&leaf) {
            let signed_data = x509_signed_data(sct, leaf_der.as_ref())?;
            return self.verify_signed_data(sct, &signed_data);
        }

        let issuer_der = chain.get(1).ok_or_else(|| {
            Error::ChainShape(
                "chain with precertificate or certificate must contain issuer".to_string(),
            )
        })?;
        let issuer = parse_certificate(issuer_der.as_ref())?;

        let issuer_info = if is_precertificate_signing_cert(&issuer)? {
            let real_issuer_der = chain.get(2).ok_or_else(|| {
                Error::ChainShape(
                    "chain with precertificate signed by precertificate signing cert must contain issuer"
                        .to_string(),
                )
            })?;
            let real_issuer = parse_certificate(real_issuer_der.as_ref())?;
            IssuerInformation::from_precert_signing_cert(&issuer, &real_issuer)?
        } else {
            IssuerInformation::from_issuer(&issuer)?
        };

        self.verify_precertificate(sct, &leaf, &issuer_info)
    }

    /// Verify an SCT over a precertificate, or a final certificate with embedded SCTs
    pub fn verify_precertificate(
        &self,
        sct: &SignedCertificateTimestamp,
        certificate: &Certificate,
        issuer: &IssuerInformation,
    ) -> Result<bool> {
        self.check_log_id(sct)?;
        let tbs = reconstruct_tbs(certificate, issuer)?;
        let signed_data = precert_signed_data(sct, issuer.key_hash, &tbs)?;
        self.verify_signed_data(sct, &signed_data)
    }

    fn check_log_id(&self, sct: &SignedCertificateTimestamp) -> Result<()> {
        if sct.log_id != *self.log.id() {
            return Err(Error::LogIdMismatch {
                sct: sct.log_id.to_base64(),
                log: self.log.id().to_base64(),
            });
        }
        Ok(())
    }

    fn verification_key(&self, sct: &SignedCertificateTimestamp) -> Result<VerificationKey> {
        let spki = self.log.subject_public_key_info()?;
        let scheme = ct_crypto::sct_signing_scheme(&spki).map_err(|e| match e {
            ct_crypto::Error::UnsupportedAlgorithm(reason) => Error::UnsupportedAlgorithm(reason),
            other => Error::Crypto(other),
        })?;

        if sct.signature.hash_algorithm != HashAlgorithm::Sha256 {
            return Err(Error::UnsupportedAlgorithm(format!(
                "SCT hash algorithm {:?}, logs sign with SHA-256",
                sct.signature.hash_algorithm
            )));
        }

        let expected = match scheme {
            SigningScheme::RsaPkcs1Sha256 => SignatureAlgorithm::Rsa,
            _ => SignatureAlgorithm::Ecdsa,
        };
        if sct.signature.signature_algorithm != expected {
            return Err(Error::UnsupportedAlgorithm(format!(
                "SCT signature algorithm {:?} does not match {} log key",
                sct.signature.signature_algorithm, scheme
            )));
        }

        Ok(VerificationKey::from_spki(&spki, scheme))
    }

    fn verify_signed_data(
        &self,
        sct: &SignedCertificateTimestamp,
        signed_data: &[u8],
    ) -> Result<bool> {
        let key = self.verification_key(sct)?;
        match key.verify(signed_data, &sct.signature.signature) {
            Ok(()) => Ok(true),
            Err(ct_crypto::Error::Verification(reason)) => {
                tracing::debug!(log = %self.log, "SCT signature did not verify: {}", reason);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
