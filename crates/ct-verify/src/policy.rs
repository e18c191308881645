//! Trust policy turning per-SCT results into a decision

use crate::result::{valid_sct_count, Failure, SctResults, Success, VerificationResult};
use chrono::{DateTime, Datelike, Utc};
use x509_cert::time::Time;
use x509_cert::Certificate;

/// Decides whether a certificate's SCT results establish trust
pub trait CtPolicy: Send + Sync {
    fn policy_verification_result(
        &self,
        leaf: &Certificate,
        scts: SctResults,
    ) -> VerificationResult;
}

/// Certificate lifetime measured in whole calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateLifetime {
    pub months: u32,
    /// Whether a partial month remains after the whole months
    pub has_partial_month: bool,
}

impl CertificateLifetime {
    /// Measure the lifetime between `start` and `end`
    ///
    /// A month is counted once the end date reaches the start's day of month.
    /// An end before the start yields zero months.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start {
            return Self {
                months: 0,
                has_partial_month: false,
            };
        }

        let mut months =
            (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
        if end.day() < start.day() {
            months -= 1;
        }

        Self {
            months: u32::try_from(months).unwrap_or(0),
            has_partial_month: end.day() != start.day(),
        }
    }

    /// Number of valid SCTs required for a certificate of this lifetime
    pub fn min_sct_count(&self) -> usize {
        let partial = self.has_partial_month;
        if self.months > 39 || (self.months == 39 && partial) {
            5
        } else if self.months > 27 || (self.months == 27 && partial) {
            4
        } else if self.months >= 15 {
            3
        } else {
            2
        }
    }
}

fn to_datetime(time: &Time) -> DateTime<Utc> {
    let secs = time.to_unix_duration().as_secs();
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// The validity period of a certificate as a [`CertificateLifetime`]
pub fn certificate_lifetime(cert: &Certificate) -> CertificateLifetime {
    let validity = &cert.tbs_certificate.validity;
    CertificateLifetime::between(
        to_datetime(&validity.not_before),
        to_datetime(&validity.not_after),
    )
}

/// Lifetime-based SCT count requirement
///
/// Certificates valid for under 15 months need 2 valid SCTs, up to 27 months
/// 3, up to 39 months 4, and longer ones 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl CtPolicy for DefaultPolicy {
    fn policy_verification_result(
        &self,
        leaf: &Certificate,
        scts: SctResults,
    ) -> VerificationResult {
        let min_sct_count = certificate_lifetime(leaf).min_sct_count();
        let valid = valid_sct_count(&scts);

        if valid < min_sct_count {
            tracing::debug!(valid, min_sct_count, "Too few trusted SCTs");
            Failure::TooFewSctsTrusted {
                scts,
                min_sct_count,
            }
            .into()
        } else {
            Success::Trusted(scts).into()
        }
    }
}
