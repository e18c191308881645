//! Reporting of verification outcomes

use crate::result::VerificationResult;

/// Receives the outcome of every verification
pub trait CtLogger: Send + Sync {
    fn log(&self, host: &str, result: &VerificationResult);
}

/// Emits outcomes as `tracing` events
///
/// Successes are logged at `debug`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CtLogger for TracingLogger {
    fn log(&self, host: &str, result: &VerificationResult) {
        match result {
            VerificationResult::Success(_) => tracing::debug!(host, "{}", result),
            VerificationResult::Failure(_) => tracing::warn!(host, "{}", result),
        }
    }
}

impl<F> CtLogger for F
where
    F: Fn(&str, &VerificationResult) + Send + Sync,
{
    fn log(&self, host: &str, result: &VerificationResult) {
        self(host, result)
    }
}
