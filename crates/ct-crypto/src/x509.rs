//! Mapping X.509 key and signature algorithm identifiers to verification schemes

use crate::error::{Error, Result};
use crate::SigningScheme;
use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1,
    SECP_384_R_1, SHA_256_WITH_RSA_ENCRYPTION, SHA_384_WITH_RSA_ENCRYPTION,
    SHA_512_WITH_RSA_ENCRYPTION,
};
use const_oid::ObjectIdentifier;
use spki::SubjectPublicKeyInfoOwned;

/// The kind of key held in a SubjectPublicKeyInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyType {
    /// EC key on NIST P-256
    EcP256,
    /// EC key on NIST P-384
    EcP384,
    /// RSA key
    Rsa,
}

/// Determine the key type of a SubjectPublicKeyInfo
pub fn public_key_type(spki: &SubjectPublicKeyInfoOwned) -> Result<PublicKeyType> {
    let alg_oid = spki.algorithm.oid;

    if alg_oid == ID_EC_PUBLIC_KEY {
        let params = spki.algorithm.parameters.as_ref().ok_or_else(|| {
            Error::UnsupportedAlgorithm("EC key missing curve parameters".to_string())
        })?;
        // params.value() is the raw OID content (without tag/length)
        let curve_oid = ObjectIdentifier::from_bytes(params.value())
            .map_err(|e| Error::InvalidKeyFormat(format!("failed to parse EC curve OID: {}", e)))?;

        if curve_oid == SECP_256_R_1 {
            Ok(PublicKeyType::EcP256)
        } else if curve_oid == SECP_384_R_1 {
            Ok(PublicKeyType::EcP384)
        } else {
            tracing::warn!("Unsupported EC curve OID: {}", curve_oid);
            Err(Error::UnsupportedAlgorithm(format!("EC curve {}", curve_oid)))
        }
    } else if alg_oid == RSA_ENCRYPTION {
        Ok(PublicKeyType::Rsa)
    } else {
        tracing::warn!("Unsupported public key algorithm OID: {}", alg_oid);
        Err(Error::UnsupportedAlgorithm(format!("public key algorithm {}", alg_oid)))
    }
}

/// Scheme for SCT signatures made by a log holding this key
///
/// Logs sign with SHA-256 regardless of key type: ECDSA for EC keys and
/// PKCS#1 v1.5 for RSA keys.
pub fn sct_signing_scheme(spki: &SubjectPublicKeyInfoOwned) -> Result<SigningScheme> {
    Ok(match public_key_type(spki)? {
        PublicKeyType::EcP256 => SigningScheme::EcdsaP256Sha256,
        PublicKeyType::EcP384 => SigningScheme::EcdsaP384Sha256,
        PublicKeyType::Rsa => SigningScheme::RsaPkcs1Sha256,
    })
}

/// Scheme for a certificate signature with algorithm `signature_oid` made by `issuer_spki`
pub fn certificate_signing_scheme(
    signature_oid: &ObjectIdentifier,
    issuer_spki: &SubjectPublicKeyInfoOwned,
) -> Result<SigningScheme> {
    let key_type = public_key_type(issuer_spki)?;
    let scheme = match (key_type, *signature_oid) {
        (PublicKeyType::EcP256, oid) if oid == ECDSA_WITH_SHA_256 => SigningScheme::EcdsaP256Sha256,
        (PublicKeyType::EcP256, oid) if oid == ECDSA_WITH_SHA_384 => SigningScheme::EcdsaP256Sha384,
        (PublicKeyType::EcP384, oid) if oid == ECDSA_WITH_SHA_256 => SigningScheme::EcdsaP384Sha256,
        (PublicKeyType::EcP384, oid) if oid == ECDSA_WITH_SHA_384 => SigningScheme::EcdsaP384Sha384,
        (PublicKeyType::Rsa, oid) if oid == SHA_256_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha256
        }
        (PublicKeyType::Rsa, oid) if oid == SHA_384_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha384
        }
        (PublicKeyType::Rsa, oid) if oid == SHA_512_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha512
        }
        (key_type, oid) => {
            return Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm {} with {:?} key",
                oid, key_type
            )))
        }
    };
    Ok(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_pair::KeyPair;
    use der::asn1::BitString;
    use spki::AlgorithmIdentifierOwned;

    #[test]
    fn test_sct_scheme_for_ec_keys() {
        let p256 = KeyPair::generate_ecdsa_p256().unwrap();
        let p384 = KeyPair::generate_ecdsa_p384().unwrap();
        assert_eq!(
            sct_signing_scheme(&p256.subject_public_key_info().unwrap()).unwrap(),
            SigningScheme::EcdsaP256Sha256
        );
        assert_eq!(
            sct_signing_scheme(&p384.subject_public_key_info().unwrap()).unwrap(),
            SigningScheme::EcdsaP384Sha256
        );
    }

    #[test]
    fn test_sct_scheme_for_rsa_key() {
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: RSA_ENCRYPTION,
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(&[0x30, 0x00]).unwrap(),
        };
        assert_eq!(
            sct_signing_scheme(&spki).unwrap(),
            SigningScheme::RsaPkcs1Sha256
        );
    }

    #[test]
    fn test_unsupported_key_type() {
        // Ed25519
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: ObjectIdentifier::new_unwrap("1.3.101.112"),
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(&[0u8; 32]).unwrap(),
        };
        let err = sct_signing_scheme(&spki).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn test_certificate_scheme() {
        let kp = KeyPair::generate_ecdsa_p384().unwrap();
        let spki = kp.subject_public_key_info().unwrap();
        assert_eq!(
            certificate_signing_scheme(&ECDSA_WITH_SHA_384, &spki).unwrap(),
            SigningScheme::EcdsaP384Sha384
        );
        assert!(certificate_signing_scheme(&SHA_256_WITH_RSA_ENCRYPTION, &spki).is_err());
    }
}
