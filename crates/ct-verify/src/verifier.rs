//! Certificate transparency verification of a presented chain
//!
//! [`CtVerifier`] ties the pieces together: host scoping decides whether a
//! connection is checked at all, the chain cleaner builds the path, each SCT
//! embedded in the leaf is checked against the log it names, and the policy
//! turns the per-SCT results into a decision.

use crate::certificate::{embedded_scts, parse_certificate};
use crate::chain::{ChainCleaner, PassThroughChainCleaner};
use crate::error::{Error, Result};
use crate::host::{HostPattern, HostScope};
use crate::logger::{CtLogger, TracingLogger};
use crate::policy::{CtPolicy, DefaultPolicy};
use crate::result::{
    Failure, InvalidSct, SctResults, SctVerificationResult, Success, VerificationResult,
};
use crate::signature::LogSignatureVerifier;
use chrono::Utc;
use ct_codec::SignedCertificateTimestamp;
use ct_log_list::{LogListProvider, LogServer};
use rustls_pki_types::CertificateDer;
use std::fmt;
use std::sync::Arc;

/// Source of the current time in milliseconds since the epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// Verifies the SCTs embedded in certificate chains
///
/// Built with [`CtVerifierBuilder`]. Holds only immutable configuration and
/// shared collaborators, so a single verifier can serve many connections.
#[derive(Clone)]
pub struct CtVerifier {
    hosts: HostScope,
    log_list: Arc<dyn LogListProvider>,
    policy: Arc<dyn CtPolicy>,
    chain_cleaner: Arc<dyn ChainCleaner>,
    logger: Option<Arc<dyn CtLogger>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtVerifier")
            .field("hosts", &self.hosts)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl CtVerifier {
    pub fn builder() -> CtVerifierBuilder {
        CtVerifierBuilder::default()
    }

    pub fn hosts(&self) -> &HostScope {
        &self.hosts
    }

    /// Verify the chain presented by `host` over a secure connection
    ///
    /// `chain` is leaf first.
    pub fn verify(&self, host: &str, chain: &[CertificateDer<'_>]) -> VerificationResult {
        self.verify_connection(host, chain, true)
    }

    /// Verify the chain presented by `host`
    ///
    /// Connections that are not secure are reported as
    /// [`Success::InsecureConnection`] without looking at the chain.
    pub fn verify_connection(
        &self,
        host: &str,
        chain: &[CertificateDer<'_>],
        secure: bool,
    ) -> VerificationResult {
        let result = self.evaluate(host, chain, secure);
        if let Some(logger) = &self.logger {
            logger.log(host, &result);
        }
        result
    }

    fn evaluate(
        &self,
        host: &str,
        chain: &[CertificateDer<'_>],
        secure: bool,
    ) -> VerificationResult {
        if !self.hosts.is_enabled_for(host) {
            return Success::DisabledForHost(host.to_string()).into();
        }
        if !secure {
            return Success::InsecureConnection(host.to_string()).into();
        }
        if chain.is_empty() {
            return Failure::NoCertificates.into();
        }

        let cleaned = match self.chain_cleaner.clean(chain, host) {
            Ok(cleaned) => cleaned,
            Err(e) => return Failure::ChainCleaningFailed(e.to_string()).into(),
        };
        let Some(leaf_der) = cleaned.first() else {
            return Failure::NoCertificates.into();
        };

        let logs = match self.log_list.log_servers() {
            Ok(logs) => logs,
            Err(e) => return Failure::LogServersFailed(e.to_string()).into(),
        };

        let leaf = match parse_certificate(leaf_der.as_ref()) {
            Ok(leaf) => leaf,
            Err(e) => return Failure::UnknownIoException(e.to_string()).into(),
        };
        let scts = match embedded_scts(&leaf) {
            Ok(Some(scts)) => scts,
            Ok(None) => return Failure::NoScts.into(),
            Err(e) => return Failure::UnknownIoException(e.to_string()).into(),
        };

        let now = self.clock.now_millis();
        let results: SctResults = scts
            .iter()
            .map(|sct| {
                let result = verify_sct(sct, &cleaned, &logs, now);
                tracing::debug!(log_id = %sct.log_id, host, "{}", result);
                (sct.log_id.to_base64(), result)
            })
            .collect();

        self.policy.policy_verification_result(&leaf, results)
    }
}

/// Check a single SCT against the trusted logs
fn verify_sct(
    sct: &SignedCertificateTimestamp,
    chain: &[CertificateDer<'_>],
    logs: &[LogServer],
    now: u64,
) -> SctVerificationResult {
    let Some(log) = logs.iter().find(|log| *log.id() == sct.log_id) else {
        return InvalidSct::NoTrustedLogServerFound.into();
    };

    if sct.timestamp > now {
        return InvalidSct::FutureTimestamp {
            timestamp: sct.timestamp,
            now,
        }
        .into();
    }

    if let Some(valid_until) = log.valid_until {
        if sct.timestamp > valid_until {
            return InvalidSct::LogServerUntrusted {
                timestamp: sct.timestamp,
                log_server_valid_until: valid_until,
            }
            .into();
        }
    }

    match LogSignatureVerifier::new(log).verify_chain(sct, chain) {
        Ok(true) => SctVerificationResult::Valid,
        Ok(false) => InvalidSct::FailedVerification.into(),
        Err(
            e @ (Error::ChainShape(_)
            | Error::VersionTooLow(_)
            | Error::MissingAuthorityKeyIdentifier),
        ) => InvalidSct::Failed(e.to_string()).into(),
        Err(e) => InvalidSct::FailedWithException(e.to_string()).into(),
    }
}

/// Configuration for a [`CtVerifier`]
///
/// At least one include host and a log list provider are required. The
/// policy defaults to [`DefaultPolicy`], the chain cleaner to
/// [`PassThroughChainCleaner`], the logger to [`TracingLogger`] and the clock
/// to the system clock.
pub struct CtVerifierBuilder {
    include_hosts: Vec<String>,
    exclude_hosts: Vec<String>,
    log_list: Option<Arc<dyn LogListProvider>>,
    policy: Arc<dyn CtPolicy>,
    chain_cleaner: Arc<dyn ChainCleaner>,
    logger: Option<Arc<dyn CtLogger>>,
    clock: Arc<dyn Clock>,
}

impl Default for CtVerifierBuilder {
    fn default() -> Self {
        Self {
            include_hosts: Vec::new(),
            exclude_hosts: Vec::new(),
            log_list: None,
            policy: Arc::new(DefaultPolicy),
            chain_cleaner: Arc::new(PassThroughChainCleaner),
            logger: Some(Arc::new(TracingLogger)),
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for CtVerifierBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtVerifierBuilder")
            .field("include_hosts", &self.include_hosts)
            .field("exclude_hosts", &self.exclude_hosts)
            .field("log_list", &self.log_list.is_some())
            .finish_non_exhaustive()
    }
}

impl CtVerifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable verification for a host or `*.` wildcard pattern
    pub fn add_include_host(mut self, pattern: impl Into<String>) -> Self {
        self.include_hosts.push(pattern.into());
        self
    }

    /// Disable verification for a host that an include pattern would cover
    pub fn add_exclude_host(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_hosts.push(pattern.into());
        self
    }

    pub fn log_list_provider(mut self, provider: impl LogListProvider + 'static) -> Self {
        self.log_list = Some(Arc::new(provider));
        self
    }

    pub fn policy(mut self, policy: impl CtPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn chain_cleaner(mut self, cleaner: impl ChainCleaner + 'static) -> Self {
        self.chain_cleaner = Arc::new(cleaner);
        self
    }

    pub fn logger(mut self, logger: impl CtLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Do not report results
    pub fn without_logger(mut self) -> Self {
        self.logger = None;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<CtVerifier> {
        let include = self
            .include_hosts
            .iter()
            .map(|pattern| HostPattern::new(pattern))
            .collect::<Result<Vec<_>>>()?;
        let exclude = self
            .exclude_hosts
            .iter()
            .map(|pattern| HostPattern::new(pattern))
            .collect::<Result<Vec<_>>>()?;
        let hosts = HostScope::new(include, exclude)?;
        let log_list = self.log_list.ok_or(Error::MissingLogListProvider)?;

        Ok(CtVerifier {
            hosts,
            log_list,
            policy: self.policy,
            chain_cleaner: self.chain_cleaner,
            logger: self.logger,
            clock: self.clock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_log_list::StaticLogListProvider;
    use std::sync::Mutex;

    struct FailingProvider;

    impl LogListProvider for FailingProvider {
        fn log_servers(&self) -> ct_log_list::Result<Arc<[LogServer]>> {
            Err(ct_log_list::Error::Fetch("network unreachable".to_string()))
        }
    }

    fn verifier(include: &str) -> CtVerifierBuilder {
        CtVerifier::builder()
            .add_include_host(include)
            .log_list_provider(StaticLogListProvider::new(Vec::<LogServer>::new()))
            .without_logger()
    }

    // ==== Builder Tests ====

    #[test]
    fn test_build_requires_include_host() {
        let err = CtVerifier::builder()
            .log_list_provider(StaticLogListProvider::new(Vec::<LogServer>::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::NoIncludeHosts));
    }

    #[test]
    fn test_build_requires_log_list_provider() {
        let err = CtVerifier::builder()
            .add_include_host("*.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingLogListProvider));
    }

    #[test]
    fn test_build_rejects_wildcard_exclude() {
        let err = verifier("*.example.com")
            .add_exclude_host("*.internal.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHostPattern(_)));
    }

    // ==== Early Exit Tests ====

    #[test]
    fn test_disabled_for_host() {
        let verifier = verifier("*.example.com")
            .add_exclude_host("skip.example.com")
            .build()
            .unwrap();

        assert_eq!(
            verifier.verify("other.org", &[]),
            VerificationResult::from(Success::DisabledForHost("other.org".to_string()))
        );
        assert_eq!(
            verifier.verify("skip.example.com", &[]),
            VerificationResult::from(Success::DisabledForHost(
                "skip.example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_insecure_connection() {
        let verifier = verifier("www.example.com").build().unwrap();
        assert_eq!(
            verifier.verify_connection("www.example.com", &[], false),
            VerificationResult::from(Success::InsecureConnection(
                "www.example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_no_certificates() {
        let verifier = verifier("www.example.com").build().unwrap();
        assert_eq!(
            verifier.verify("www.example.com", &[]),
            VerificationResult::from(Failure::NoCertificates)
        );
    }

    #[test]
    fn test_log_list_failure() {
        let verifier = CtVerifier::builder()
            .add_include_host("www.example.com")
            .log_list_provider(FailingProvider)
            .without_logger()
            .build()
            .unwrap();

        let chain = [CertificateDer::from(vec![0x30, 0x00])];
        let result = verifier.verify("www.example.com", &chain);
        assert!(matches!(
            result,
            VerificationResult::Failure(Failure::LogServersFailed(_))
        ));
    }

    #[test]
    fn test_unparseable_leaf() {
        let verifier = verifier("www.example.com").build().unwrap();
        let chain = [CertificateDer::from(vec![0x30, 0x00])];
        assert!(matches!(
            verifier.verify("www.example.com", &chain),
            VerificationResult::Failure(Failure::UnknownIoException(_))
        ));
    }

    #[test]
    fn test_logger_receives_every_result() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let verifier = verifier("www.example.com")
            .logger(move |host: &str, result: &VerificationResult| {
                sink.lock().unwrap().push((host.to_string(), result.is_success()));
            })
            .build()
            .unwrap();

        verifier.verify("www.example.com", &[]);
        verifier.verify("other.org", &[]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("www.example.com".to_string(), false),
                ("other.org".to_string(), true),
            ]
        );
    }
}
