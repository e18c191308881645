//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use aws_lc_rs::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA384_ASN1,
    ECDSA_P384_SHA256_ASN1, ECDSA_P384_SHA384_ASN1, RSA_PKCS1_2048_8192_SHA256,
    RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512,
};
use der::Decode;
use spki::SubjectPublicKeyInfoOwned;

/// A public key for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    /// Raw public key bytes: the uncompressed EC point or the PKCS#1 RSAPublicKey
    pub bytes: Vec<u8>,
    /// The scheme to use for verification
    pub scheme: SigningScheme,
}

impl VerificationKey {
    /// Create a new verification key
    pub fn new(bytes: Vec<u8>, scheme: SigningScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Build a key from a SubjectPublicKeyInfo and the scheme it should verify under
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned, scheme: SigningScheme) -> Self {
        Self::new(spki.subject_public_key.raw_bytes().to_vec(), scheme)
    }

    /// Build a key from a DER-encoded SubjectPublicKeyInfo
    pub fn from_spki_der(der: &[u8], scheme: SigningScheme) -> Result<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(der)?;
        Ok(Self::from_spki(&spki, scheme))
    }

    fn algorithm(&self) -> &'static dyn VerificationAlgorithm {
        match self.scheme {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            SigningScheme::EcdsaP256Sha384 => &ECDSA_P256_SHA384_ASN1,
            SigningScheme::EcdsaP384Sha256 => &ECDSA_P384_SHA256_ASN1,
            SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
            SigningScheme::RsaPkcs1Sha256 => &RSA_PKCS1_2048_8192_SHA256,
            SigningScheme::RsaPkcs1Sha384 => &RSA_PKCS1_2048_8192_SHA384,
            SigningScheme::RsaPkcs1Sha512 => &RSA_PKCS1_2048_8192_SHA512,
        }
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        UnparsedPublicKey::new(self.algorithm(), &self.bytes)
            .verify(data, signature)
            .map_err(|_| Error::Verification(format!("{} signature invalid", self.scheme)))
    }
}

/// Verify a signature made by the key in a DER-encoded SubjectPublicKeyInfo
pub fn verify_signature(
    public_key_der: &[u8],
    data: &[u8],
    signature: &[u8],
    scheme: SigningScheme,
) -> Result<()> {
    VerificationKey::from_spki_der(public_key_der, scheme)?.verify(data, signature)
}
