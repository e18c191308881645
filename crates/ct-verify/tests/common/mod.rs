//! Test PKI: a root CA, trusted logs and leaf certificates with embedded SCTs

#![allow(dead_code)]

use ct_codec::constants::{
    AUTHORITY_KEY_IDENTIFIER_OID, POISON_EXTENSION_OID, PRECERTIFICATE_SIGNING_OID,
    SCT_CERTIFICATE_OID,
};
use ct_codec::{
    encode_sct_list, DigitallySigned, HashAlgorithm, LogId, SignatureAlgorithm,
    SignedCertificateTimestamp, Version as SctVersion,
};
use ct_crypto::KeyPair;
use ct_log_list::LogServer;
use ct_verify::signature::precert_signed_data;
use ct_verify::{reconstruct_tbs, IssuerInformation};
use der::asn1::{BitString, OctetString, UtcTime};
use der::Encode;
use rustls_pki_types::CertificateDer;
use spki::AlgorithmIdentifierOwned;
use std::str::FromStr;
use std::time::Duration;
use x509_cert::certificate::{TbsCertificate, Version};
use x509_cert::ext::pkix::ExtendedKeyUsage;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::{Time, Validity};
use x509_cert::Certificate;

/// 2024-01-01T00:00:00Z
pub const NOT_BEFORE_SECS: u64 = 1_704_067_200;
/// Ninety days after [`NOT_BEFORE_SECS`]
pub const NOT_AFTER_SECS: u64 = NOT_BEFORE_SECS + 90 * 24 * 60 * 60;
/// SCT timestamp used by default, one hour before the leaf becomes valid
pub const SCT_TIMESTAMP: u64 = (NOT_BEFORE_SECS - 3600) * 1000;
/// The clock the verifier runs with in tests
pub const NOW: u64 = (NOT_BEFORE_SECS + 7 * 24 * 60 * 60) * 1000;

fn time(secs: u64) -> Time {
    Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

fn ecdsa_with_sha256() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
        parameters: None,
    }
}

fn extension(oid: const_oid::ObjectIdentifier, critical: bool, value: Vec<u8>) -> Extension {
    Extension {
        extn_id: oid,
        critical,
        extn_value: OctetString::new(value).unwrap(),
    }
}

fn basic_constraints_ca() -> Extension {
    extension(
        const_oid::db::rfc5280::ID_CE_BASIC_CONSTRAINTS,
        true,
        vec![0x30, 0x03, 0x01, 0x01, 0xff],
    )
}

/// AuthorityKeyIdentifier with a key identifier derived from `key`
fn authority_key_identifier(key: &KeyPair) -> Extension {
    let key_hash = ct_crypto::sha256(key.public_key_bytes());
    let mut value = vec![0x30, 0x16, 0x80, 0x14];
    value.extend_from_slice(&key_hash[..20]);
    extension(AUTHORITY_KEY_IDENTIFIER_OID, false, value)
}

fn poison() -> Extension {
    extension(POISON_EXTENSION_OID, true, vec![0x05, 0x00])
}

fn sct_list_extension(scts: &[SignedCertificateTimestamp]) -> Extension {
    let list = encode_sct_list(scts).unwrap();
    let wrapped = OctetString::new(list).unwrap().to_der().unwrap();
    extension(SCT_CERTIFICATE_OID, false, wrapped)
}

fn precertificate_signing_eku() -> Extension {
    let eku = ExtendedKeyUsage(vec![PRECERTIFICATE_SIGNING_OID]);
    extension(
        const_oid::db::rfc5280::ID_CE_EXT_KEY_USAGE,
        false,
        eku.to_der().unwrap(),
    )
}

/// Sign `tbs` with `key`, producing a certificate
pub fn sign(tbs: TbsCertificate, key: &KeyPair) -> Certificate {
    let signature = key.sign(&tbs.to_der().unwrap()).unwrap();
    Certificate {
        tbs_certificate: tbs,
        signature_algorithm: ecdsa_with_sha256(),
        signature: BitString::from_bytes(&signature).unwrap(),
    }
}

pub fn to_der(cert: &Certificate) -> CertificateDer<'static> {
    CertificateDer::from(cert.to_der().unwrap())
}

struct TbsParams<'a> {
    serial: u8,
    subject: &'a str,
    issuer: &'a Name,
    subject_key: &'a KeyPair,
    validity: Validity,
    extensions: Vec<Extension>,
}

fn tbs(params: TbsParams<'_>) -> TbsCertificate {
    TbsCertificate {
        version: Version::V3,
        serial_number: SerialNumber::new(&[params.serial]).unwrap(),
        signature: ecdsa_with_sha256(),
        issuer: params.issuer.clone(),
        validity: params.validity,
        subject: Name::from_str(params.subject).unwrap(),
        subject_public_key_info: params.subject_key.subject_public_key_info().unwrap(),
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(params.extensions),
    }
}

fn ca_validity() -> Validity {
    Validity {
        not_before: time(NOT_BEFORE_SECS - 365 * 24 * 60 * 60),
        not_after: time(NOT_BEFORE_SECS + 10 * 365 * 24 * 60 * 60),
    }
}

/// A certificate authority with its key
pub struct Authority {
    pub key: KeyPair,
    pub cert: Certificate,
}

impl Authority {
    /// A self-signed root
    pub fn root(name: &str) -> Self {
        let key = KeyPair::generate_ecdsa_p256().unwrap();
        let subject = Name::from_str(name).unwrap();
        let tbs = tbs(TbsParams {
            serial: 1,
            subject: name,
            issuer: &subject,
            subject_key: &key,
            validity: ca_validity(),
            extensions: vec![basic_constraints_ca()],
        });
        let cert = sign(tbs, &key);
        Self { key, cert }
    }

    /// An intermediate CA issued by `self`
    pub fn intermediate(&self, name: &str) -> Self {
        self.subordinate(
            name,
            vec![basic_constraints_ca(), authority_key_identifier(&self.key)],
        )
    }

    /// A precertificate signing certificate acting for `self`
    pub fn precertificate_signer(&self) -> Self {
        self.subordinate(
            "CN=Test Precertificate Signer",
            vec![
                basic_constraints_ca(),
                authority_key_identifier(&self.key),
                precertificate_signing_eku(),
            ],
        )
    }

    fn subordinate(&self, name: &str, extensions: Vec<Extension>) -> Self {
        let key = KeyPair::generate_ecdsa_p256().unwrap();
        let tbs = tbs(TbsParams {
            serial: 2,
            subject: name,
            issuer: &self.cert.tbs_certificate.subject,
            subject_key: &key,
            validity: ca_validity(),
            extensions,
        });
        let cert = sign(tbs, &self.key);
        Self { key, cert }
    }

    pub fn der(&self) -> CertificateDer<'static> {
        to_der(&self.cert)
    }

    /// A plain leaf with no SCTs
    pub fn leaf(&self, host: &str) -> Certificate {
        sign(self.leaf_tbs(host, leaf_validity(), Vec::new()), &self.key)
    }

    /// A poisoned precertificate for `host`, signed by `self`
    pub fn precertificate(&self, host: &str) -> Certificate {
        sign(self.leaf_tbs(host, leaf_validity(), vec![poison()]), &self.key)
    }

    fn leaf_tbs(
        &self,
        host: &str,
        validity: Validity,
        mut extensions: Vec<Extension>,
    ) -> TbsCertificate {
        let key = KeyPair::generate_ecdsa_p256().unwrap();
        extensions.insert(0, authority_key_identifier(&self.key));
        tbs(TbsParams {
            serial: 3,
            subject: &format!("CN={}", host),
            issuer: &self.cert.tbs_certificate.subject,
            subject_key: &key,
            validity,
            extensions,
        })
    }

    /// Issue a leaf with SCTs embedded by `logs`
    ///
    /// Each log signs the precertificate at its timestamp; the resulting
    /// SCTs are embedded in the final certificate issued by `self`.
    pub fn issue(
        &self,
        host: &str,
        validity: Validity,
        logs: &[(&TestLog, u64)],
    ) -> Certificate {
        let precert = sign(self.leaf_tbs(host, validity, vec![poison()]), &self.key);
        let issuer = IssuerInformation::from_issuer(&self.cert).unwrap();
        let signed_tbs = reconstruct_tbs(&precert, &issuer).unwrap();

        let scts: Vec<_> = logs
            .iter()
            .map(|(log, timestamp)| {
                log.sign_precertificate(*timestamp, issuer.key_hash, &signed_tbs)
            })
            .collect();

        let mut tbs = precert.tbs_certificate;
        let mut extensions = tbs.extensions.take().unwrap_or_default();
        extensions.retain(|ext| ext.extn_id != POISON_EXTENSION_OID);
        extensions.push(sct_list_extension(&scts));
        tbs.extensions = Some(extensions);
        sign(tbs, &self.key)
    }
}

pub fn leaf_validity() -> Validity {
    validity_secs(NOT_BEFORE_SECS, NOT_AFTER_SECS)
}

pub fn validity_secs(not_before: u64, not_after: u64) -> Validity {
    Validity {
        not_before: time(not_before),
        not_after: time(not_after),
    }
}

/// A log with its signing key
pub struct TestLog {
    key: KeyPair,
    pub server: LogServer,
}

impl TestLog {
    pub fn new() -> Self {
        Self::with_valid_until(None)
    }

    pub fn with_valid_until(valid_until: Option<u64>) -> Self {
        let key = KeyPair::generate_ecdsa_p256().unwrap();
        let server = LogServer::new(key.public_key_to_der().unwrap(), valid_until).unwrap();
        Self { key, server }
    }

    pub fn id(&self) -> LogId {
        *self.server.id()
    }

    pub fn sign_precertificate(
        &self,
        timestamp: u64,
        issuer_key_hash: [u8; 32],
        tbs: &[u8],
    ) -> SignedCertificateTimestamp {
        let mut sct = SignedCertificateTimestamp {
            version: SctVersion::V1,
            log_id: self.id(),
            timestamp,
            extensions: Vec::new(),
            signature: DigitallySigned {
                hash_algorithm: HashAlgorithm::Sha256,
                signature_algorithm: SignatureAlgorithm::Ecdsa,
                signature: Vec::new(),
            },
        };
        let signed_data = precert_signed_data(&sct, issuer_key_hash, tbs).unwrap();
        sct.signature.signature = self.key.sign(&signed_data).unwrap();
        sct
    }
}
