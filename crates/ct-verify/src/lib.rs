//! Certificate Transparency verification for TLS certificate chains
//!
//! This crate checks the Signed Certificate Timestamps (RFC 6962) embedded in
//! a leaf certificate against a list of trusted logs, and applies a policy
//! that decides how many valid SCTs a certificate needs.
//!
//! # Example
//!
//! ```no_run
//! use ct_log_list::{LogList, StaticLogListProvider};
//! use ct_verify::CtVerifier;
//! use rustls_pki_types::CertificateDer;
//!
//! # fn example(chain: Vec<CertificateDer<'static>>) -> Result<(), Box<dyn std::error::Error>> {
//! let logs = LogList::from_file("log_list.json")?;
//! let verifier = CtVerifier::builder()
//!     .add_include_host("*.example.com")
//!     .log_list_provider(StaticLogListProvider::from(logs))
//!     .build()?;
//!
//! let result = verifier.verify("www.example.com", &chain);
//! if result.is_failure() {
//!     eprintln!("{}", result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod chain;
pub mod error;
pub mod host;
pub mod logger;
pub mod policy;
pub mod result;
pub mod signature;
pub mod tbs;
pub mod verifier;

pub use chain::{ChainCleaner, PassThroughChainCleaner, TrustAnchorChainCleaner};
pub use error::{Error, Result};
pub use host::{HostPattern, HostScope};
pub use logger::{CtLogger, TracingLogger};
pub use policy::{certificate_lifetime, CertificateLifetime, CtPolicy, DefaultPolicy};
pub use result::{
    Failure, InvalidSct, SctResults, SctVerificationResult, Success, VerificationResult,
};
pub use signature::LogSignatureVerifier;
pub use tbs::{reconstruct_tbs, IssuerInformation};
pub use verifier::{Clock, CtVerifier, CtVerifierBuilder, SystemClock};
