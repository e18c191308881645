//! Cryptographic primitives for Certificate Transparency verification
//!
//! SHA-256 and signature verification backed by aws-lc-rs, plus the mapping
//! from X.509 key and signature algorithm identifiers to verification schemes.
//!
//! The `test-utils` feature adds `KeyPair` for generating fixture keys.

pub mod error;
pub mod hash;
#[cfg(any(test, feature = "test-utils"))]
pub mod key_pair;
pub mod signing;
pub mod verification;
pub mod x509;

pub use error::{Error, Result};
pub use hash::sha256;
#[cfg(any(test, feature = "test-utils"))]
pub use key_pair::KeyPair;
pub use signing::SigningScheme;
pub use verification::{verify_signature, VerificationKey};
pub use x509::{certificate_signing_scheme, public_key_type, sct_signing_scheme, PublicKeyType};
