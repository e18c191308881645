//! Host patterns selecting which connections are checked

use crate::error::{Error, Result};
use rustls_pki_types::DnsName;
use std::str::FromStr;

const WILDCARD: &str = "*.";

/// An exact hostname like `example.com`, or a pattern like `*.example.com`
///
/// Hostnames are stored lowercased and compared case-insensitively. A
/// wildcard matches exactly one extra leading label: `*.example.com` matches
/// `www.example.com` but neither `example.com` nor `a.b.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostPattern {
    hostname: String,
    wildcard: bool,
}

impl HostPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let (wildcard, rest) = match pattern.strip_prefix(WILDCARD) {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let name = DnsName::try_from(rest.to_owned())
            .map_err(|e| Error::InvalidHostPattern(format!("{}: {}", pattern, e)))?
            .to_lowercase_owned();
        let hostname = name.as_ref().trim_end_matches('.').to_owned();
        Ok(Self { hostname, wildcard })
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if !self.wildcard {
            return host == self.hostname;
        }
        match host.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest == self.hostname,
            None => false,
        }
    }
}

impl FromStr for HostPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.wildcard {
            f.write_str(WILDCARD)?;
        }
        f.write_str(&self.hostname)
    }
}

/// The include and exclude sets of a verifier
#[derive(Debug, Clone, Default)]
pub struct HostScope {
    include: Vec<HostPattern>,
    exclude: Vec<HostPattern>,
}

impl HostScope {
    /// Build a scope, validating the exclude rules
    ///
    /// An exclude pattern may not be a wildcard and may not repeat an include
    /// pattern. At least one include pattern is required.
    pub fn new(include: Vec<HostPattern>, exclude: Vec<HostPattern>) -> Result<Self> {
        if include.is_empty() {
            return Err(Error::NoIncludeHosts);
        }
        for pattern in &exclude {
            if pattern.is_wildcard() {
                return Err(Error::InvalidHostPattern(format!(
                    "wildcards are not allowed in excludes: {}",
                    pattern
                )));
            }
            if include.contains(pattern) {
                return Err(Error::InvalidHostPattern(format!(
                    "{} is both included and excluded",
                    pattern
                )));
            }
        }
        Ok(Self { include, exclude })
    }

    /// Whether connections to `host` should be checked; exclusion wins
    pub fn is_enabled_for(&self, host: &str) -> bool {
        self.include.iter().any(|p| p.matches(host))
            && !self.exclude.iter().any(|p| p.matches(host))
    }

    pub fn include(&self) -> &[HostPattern] {
        &self.include
    }

    pub fn exclude(&self) -> &[HostPattern] {
        &self.exclude
    }
}
