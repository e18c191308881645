//! ECDSA key pairs for generating logs, CAs and certificates in tests
//!
//! Only built for this crate's tests or with the `test-utils` feature.

use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, KeyPair as AwsKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use der::asn1::BitString;
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

/// An ECDSA key pair
pub enum KeyPair {
    /// P-256, signs with SHA-256
    EcdsaP256(EcdsaKeyPair),
    /// P-384, signs with SHA-384
    EcdsaP384(EcdsaKeyPair),
}

impl KeyPair {
    /// Generate a new ECDSA P-256 key pair
    pub fn generate_ecdsa_p256() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
            .map_err(|_| Error::KeyGeneration("failed to generate ECDSA P-256 key".to_string()))?;
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref())?;
        Ok(KeyPair::EcdsaP256(key_pair))
    }

    /// Generate a new ECDSA P-384 key pair
    pub fn generate_ecdsa_p384() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &rng)
            .map_err(|_| Error::KeyGeneration("failed to generate ECDSA P-384 key".to_string()))?;
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, pkcs8.as_ref())?;
        Ok(KeyPair::EcdsaP384(key_pair))
    }

    /// Uncompressed public point
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp.public_key().as_ref(),
        }
    }

    /// The scheme signatures from this key verify under
    pub fn scheme(&self) -> SigningScheme {
        match self {
            KeyPair::EcdsaP256(_) => SigningScheme::EcdsaP256Sha256,
            KeyPair::EcdsaP384(_) => SigningScheme::EcdsaP384Sha384,
        }
    }

    /// Sign data, producing an ASN.1 DER ECDSA signature
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let rng = SystemRandom::new();
        let sig = match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp
                .sign(&rng, data)
                .map_err(|_| Error::Signing("ECDSA signing failed".to_string()))?,
        };
        Ok(sig.as_ref().to_vec())
    }

    /// Get the public key as a SubjectPublicKeyInfo
    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let curve = match self {
            KeyPair::EcdsaP256(_) => SECP_256_R_1,
            KeyPair::EcdsaP384(_) => SECP_384_R_1,
        };
        Ok(SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(der::Any::encode_from(&curve)?),
            },
            subject_public_key: BitString::from_bytes(self.public_key_bytes())?,
        })
    }

    /// Get the public key in DER-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        Ok(self.subject_public_key_info()?.to_der()?)
    }

    /// Get the public key in PEM-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_pem(&self) -> Result<String> {
        let der = self.public_key_to_der()?;
        Ok(pem::encode(&pem::Pem::new("PUBLIC KEY", der)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Decode;

    #[test]
    fn test_ecdsa_p256_public_key_len() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let bytes = kp.public_key_bytes();
        // Uncompressed P-256 key should be 65 bytes (0x04 + 32 bytes X + 32 bytes Y)
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x04);
    }

    #[test]
    fn test_public_key_der_roundtrip() {
        let kp = KeyPair::generate_ecdsa_p384().unwrap();
        let der = kp.public_key_to_der().unwrap();
        let spki = SubjectPublicKeyInfoOwned::from_der(&der).unwrap();
        assert_eq!(spki.algorithm.oid, ID_EC_PUBLIC_KEY);
        assert_eq!(spki.subject_public_key.raw_bytes(), kp.public_key_bytes());
    }

    #[test]
    fn test_public_key_pem() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let pem = kp.public_key_to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
    }
}
