//! Chain cleaning: turning the chain a server presented into a trusted path

use crate::certificate::parse_certificate;
use crate::error::{Error, Result};
use der::Encode;
use rustls_pki_types::CertificateDer;
use x509_cert::Certificate;

/// Maximum signers in a chain, matching OpenSSL's default depth
const MAX_SIGNERS: usize = 9;

/// Builds the chain SCT verification runs against
///
/// The result starts with the leaf and continues with its issuers in order.
pub trait ChainCleaner: Send + Sync {
    fn clean(
        &self,
        chain: &[CertificateDer<'_>],
        host: &str,
    ) -> Result<Vec<CertificateDer<'static>>>;
}

/// Uses the presented chain unchanged
///
/// Suitable when the TLS stack has already validated the chain and hands
/// over the verified path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughChainCleaner;

impl ChainCleaner for PassThroughChainCleaner {
    fn clean(
        &self,
        chain: &[CertificateDer<'_>],
        _host: &str,
    ) -> Result<Vec<CertificateDer<'static>>> {
        Ok(chain.iter().map(|c| c.clone().into_owned()).collect())
    }
}

#[derive(Debug, Clone)]
struct ParsedCertificate {
    der: CertificateDer<'static>,
    cert: Certificate,
}

impl ParsedCertificate {
    fn parse(der: &CertificateDer<'_>) -> Result<Self> {
        Ok(Self {
            cert: parse_certificate(der.as_ref())?,
            der: der.clone().into_owned(),
        })
    }

    /// Whether this certificate names `signer` as issuer and carries its signature
    fn is_signed_by(&self, signer: &ParsedCertificate) -> bool {
        if self.cert.tbs_certificate.issuer != signer.cert.tbs_certificate.subject {
            return false;
        }
        match verify_certificate_signature(&self.cert, &signer.cert) {
            Ok(()) => true,
            Err(e) => {
                tracing::trace!(
                    "Signature check against {} failed: {}",
                    signer.cert.tbs_certificate.subject,
                    e
                );
                false
            }
        }
    }
}

fn verify_certificate_signature(cert: &Certificate, signer: &Certificate) -> Result<()> {
    let signer_spki = &signer.tbs_certificate.subject_public_key_info;
    let scheme =
        ct_crypto::certificate_signing_scheme(&cert.signature_algorithm.oid, signer_spki)?;
    let key = ct_crypto::VerificationKey::from_spki(signer_spki, scheme);
    let tbs = cert.tbs_certificate.to_der()?;
    let signature = cert
        .signature
        .as_bytes()
        .ok_or_else(|| Error::Certificate("signature has unused bits".to_string()))?;
    key.verify(&tbs, signature)?;
    Ok(())
}

/// Builds a path from the leaf to one of a set of trust anchors
///
/// Starting at the leaf, each step prefers a trust anchor that signed the
/// current certificate, falling back to the first presented certificate
/// that did. The path ends at a self-signed trust anchor, or at the last
/// certificate found once any trust anchor has been reached.
#[derive(Debug, Clone)]
pub struct TrustAnchorChainCleaner {
    anchors: Vec<ParsedCertificate>,
}

impl TrustAnchorChainCleaner {
    pub fn new(anchors: &[CertificateDer<'_>]) -> Result<Self> {
        let anchors = anchors
            .iter()
            .map(ParsedCertificate::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { anchors })
    }

    fn find_trusted_signer(&self, cert: &ParsedCertificate) -> Option<&ParsedCertificate> {
        self.anchors.iter().find(|anchor| cert.is_signed_by(anchor))
    }
}

impl ChainCleaner for TrustAnchorChainCleaner {
    fn clean(
        &self,
        chain: &[CertificateDer<'_>],
        host: &str,
    ) -> Result<Vec<CertificateDer<'static>>> {
        let (leaf, rest) = chain
            .split_first()
            .ok_or_else(|| Error::ChainCleaning("certificate chain is empty".to_string()))?;

        let mut queue = rest
            .iter()
            .map(ParsedCertificate::parse)
            .collect::<Result<Vec<_>>>()?;
        let mut result = vec![ParsedCertificate::parse(leaf)?];
        let mut found_trusted = false;

        for _ in 0..MAX_SIGNERS {
            let Some(to_verify) = result.last() else {
                break;
            };

            if let Some(anchor) = self.find_trusted_signer(to_verify) {
                let self_signed = anchor.is_signed_by(anchor);
                if result.len() > 1 || to_verify.der != anchor.der {
                    result.push(anchor.clone());
                }
                if self_signed {
                    return Ok(result.into_iter().map(|c| c.der).collect());
                }
                found_trusted = true;
            } else if let Some(idx) = queue.iter().position(|c| to_verify.is_signed_by(c)) {
                result.push(queue.remove(idx));
            } else if found_trusted {
                return Ok(result.into_iter().map(|c| c.der).collect());
            } else {
                return Err(Error::ChainCleaning(format!(
                    "failed to find a trusted certificate that signed {} for {}",
                    to_verify.cert.tbs_certificate.subject, host
                )));
            }
        }

        Err(Error::ChainCleaning(format!(
            "certificate chain too long: more than {} signers",
            MAX_SIGNERS
        )))
    }
}
