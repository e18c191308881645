//! Outcomes of certificate transparency checks

use std::collections::BTreeMap;
use std::fmt;

/// Per-SCT outcomes keyed by the base64 log id of each SCT
pub type SctResults = BTreeMap<String, SctVerificationResult>;

/// The outcome of checking a single SCT
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SctVerificationResult {
    /// The log's signature over the certificate verified
    Valid,
    Invalid(InvalidSct),
}

/// Why an SCT did not count towards trust
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSct {
    /// The signature did not verify
    FailedVerification,
    /// No trusted log has the SCT's log id
    NoTrustedLogServerFound,
    /// The SCT claims to be from the future
    FutureTimestamp { timestamp: u64, now: u64 },
    /// The SCT was issued after the log stopped being trusted
    LogServerUntrusted {
        timestamp: u64,
        log_server_valid_until: u64,
    },
    /// The chain could not support verification of this SCT
    Failed(String),
    /// Verification raised an error
    FailedWithException(String),
}

impl SctVerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, SctVerificationResult::Valid)
    }
}

impl From<InvalidSct> for SctVerificationResult {
    fn from(invalid: InvalidSct) -> Self {
        SctVerificationResult::Invalid(invalid)
    }
}

impl fmt::Display for SctVerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SctVerificationResult::Valid => f.write_str("Valid SCT"),
            SctVerificationResult::Invalid(invalid) => fmt::Display::fmt(invalid, f),
        }
    }
}

impl fmt::Display for InvalidSct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSct::FailedVerification => f.write_str("SCT signature failed verification"),
            InvalidSct::NoTrustedLogServerFound => f.write_str("No trusted log server found for SCT"),
            InvalidSct::FutureTimestamp { timestamp, now } => write!(
                f,
                "SCT timestamp, {}, is in the future, current timestamp is {}.",
                timestamp, now
            ),
            InvalidSct::LogServerUntrusted {
                timestamp,
                log_server_valid_until,
            } => write!(
                f,
                "SCT timestamp, {}, is greater than the log server validity, {}.",
                timestamp, log_server_valid_until
            ),
            InvalidSct::Failed(reason) => write!(f, "SCT verification failed: {}", reason),
            InvalidSct::FailedWithException(reason) => {
                write!(f, "SCT verification failed with exception: {}", reason)
            }
        }
    }
}

/// The overall outcome for a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Success(Success),
    Failure(Failure),
}

/// Checks passed, or were not required
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Success {
    /// The host is not in scope
    DisabledForHost(String),
    /// Enough SCTs verified
    Trusted(SctResults),
    /// The connection is not over TLS, so there is nothing to check
    InsecureConnection(String),
}

/// Checks failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    NoCertificates,
    /// The trusted log list could not be obtained
    LogServersFailed(String),
    /// The leaf carries no embedded SCTs
    NoScts,
    TooFewSctsTrusted {
        scts: SctResults,
        min_sct_count: usize,
    },
    /// A certificate or SCT could not be parsed
    UnknownIoException(String),
    /// No trusted path could be built from the presented chain
    ChainCleaningFailed(String),
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, VerificationResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Per-SCT outcomes, when the result carries them
    pub fn scts(&self) -> Option<&SctResults> {
        match self {
            VerificationResult::Success(Success::Trusted(scts))
            | VerificationResult::Failure(Failure::TooFewSctsTrusted { scts, .. }) => Some(scts),
            _ => None,
        }
    }
}

impl From<Success> for VerificationResult {
    fn from(success: Success) -> Self {
        VerificationResult::Success(success)
    }
}

impl From<Failure> for VerificationResult {
    fn from(failure: Failure) -> Self {
        VerificationResult::Failure(failure)
    }
}

/// Count the SCTs that verified
pub fn valid_sct_count(scts: &SctResults) -> usize {
    scts.values().filter(|r| r.is_valid()).count()
}

struct DisplayScts<'a>(&'a SctResults);

impl fmt::Display for DisplayScts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (log_id, result)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", log_id, result)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::Success(success) => fmt::Display::fmt(success, f),
            VerificationResult::Failure(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

impl fmt::Display for Success {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Success::DisabledForHost(host) => write!(f, "Success: SCT not enabled for {}", host),
            Success::Trusted(scts) => write!(f, "Success: SCT trusted logs {}", DisplayScts(scts)),
            Success::InsecureConnection(host) => write!(
                f,
                "Success: SCT not enabled for insecure connection to {}",
                host
            ),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::NoCertificates => f.write_str("Failure: No certificates"),
            Failure::LogServersFailed(reason) => {
                write!(f, "Failure: Unable to load log servers with {}", reason)
            }
            Failure::NoScts => f.write_str(
                "Failure: This certificate does not have any Signed Certificate Timestamps in it.",
            ),
            Failure::TooFewSctsTrusted {
                scts,
                min_sct_count,
            } => write!(
                f,
                "Failure: Too few trusted SCTs, required {}, found {} in {}",
                min_sct_count,
                valid_sct_count(scts),
                DisplayScts(scts)
            ),
            Failure::UnknownIoException(reason) => write!(f, "Failure: IOException {}", reason),
            Failure::ChainCleaningFailed(reason) => {
                write!(f, "Failure: Unable to build a trusted chain: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_too_few() {
        let mut scts = SctResults::new();
        scts.insert("a".to_string(), SctVerificationResult::Valid);
        scts.insert(
            "b".to_string(),
            InvalidSct::NoTrustedLogServerFound.into(),
        );
        let result: VerificationResult = Failure::TooFewSctsTrusted {
            scts,
            min_sct_count: 2,
        }
        .into();

        assert!(result.is_failure());
        assert_eq!(
            result.to_string(),
            "Failure: Too few trusted SCTs, required 2, found 1 in {a=Valid SCT, b=No trusted log server found for SCT}"
        );
    }

    #[test]
    fn test_display_future_timestamp() {
        let invalid = InvalidSct::FutureTimestamp {
            timestamp: 20,
            now: 10,
        };
        assert_eq!(
            invalid.to_string(),
            "SCT timestamp, 20, is in the future, current timestamp is 10."
        );
    }

    #[test]
    fn test_scts_accessor() {
        let result: VerificationResult = Success::DisabledForHost("example.com".into()).into();
        assert!(result.is_success());
        assert!(result.scts().is_none());
        assert_eq!(result.to_string(), "Success: SCT not enabled for example.com");
    }
}
