//! Parsing of the published CT log list (`log_list.json`, schema v3)

use crate::error::{Error, Result};
use crate::log_server::LogServer;
use base64::Engine;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Top level of the published log list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogListJson {
    #[serde(default)]
    pub version: Option<String>,

    /// When the list was generated (RFC 3339)
    #[serde(default)]
    pub log_list_timestamp: Option<String>,

    pub operators: Vec<Operator>,
}

/// A log operator and the logs it runs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Operator {
    pub name: String,

    #[serde(default)]
    pub email: Vec<String>,

    #[serde(default)]
    pub logs: Vec<Log>,

    /// Static CT API logs
    #[serde(default)]
    pub tiled_logs: Vec<TiledLog>,
}

/// An RFC 6962 log entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Log {
    #[serde(default)]
    pub description: Option<String>,

    /// Base64 SHA-256 of `key`
    pub log_id: String,

    /// Base64 DER SubjectPublicKeyInfo
    pub key: String,

    #[serde(default)]
    pub url: Option<String>,

    /// Maximum merge delay in seconds
    #[serde(default)]
    pub mmd: Option<u64>,

    #[serde(default)]
    pub state: Option<LogState>,
}

/// A static CT API log entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiledLog {
    #[serde(default)]
    pub description: Option<String>,

    pub log_id: String,

    pub key: String,

    #[serde(default)]
    pub submission_url: Option<String>,

    #[serde(default)]
    pub monitoring_url: Option<String>,

    #[serde(default)]
    pub mmd: Option<u64>,

    #[serde(default)]
    pub state: Option<LogState>,
}

/// Lifecycle state of a log, with the time it entered that state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogState {
    Pending(StateTimestamp),
    Qualified(StateTimestamp),
    Usable(StateTimestamp),
    Readonly(StateTimestamp),
    Retired(StateTimestamp),
    Rejected(StateTimestamp),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StateTimestamp {
    /// RFC 3339
    pub timestamp: String,
}

impl LogState {
    /// Whether SCTs from a log in this state can count towards trust at all
    pub fn is_trusted(&self) -> bool {
        !matches!(self, LogState::Pending(_) | LogState::Rejected(_))
    }

    /// End of the trusted window, for logs that stopped accepting entries
    pub fn valid_until(&self) -> Result<Option<u64>> {
        match self {
            LogState::Readonly(ts) | LogState::Retired(ts) => {
                parse_timestamp_ms(&ts.timestamp).map(Some)
            }
            _ => Ok(None),
        }
    }
}

fn parse_timestamp_ms(s: &str) -> Result<u64> {
    let dt = DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::TimeParse(format!("{}: {}", s, e)))?;
    u64::try_from(dt.timestamp_millis())
        .map_err(|_| Error::TimeParse(format!("{} is before the Unix epoch", s)))
}

/// The usable logs from a published log list
#[derive(Debug, Clone)]
pub struct LogList {
    servers: Vec<LogServer>,
}

impl LogList {
    /// Parse a log list from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: LogListJson = serde_json::from_str(json)?;
        Self::from_raw(&raw)
    }

    /// Load a log list from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build the trusted log servers from a parsed list
    ///
    /// Logs without a state, or in the pending or rejected state, are skipped.
    /// Read-only and retired logs are trusted up to their state timestamp.
    pub fn from_raw(raw: &LogListJson) -> Result<Self> {
        let mut servers = Vec::new();

        for operator in &raw.operators {
            let entries = operator
                .logs
                .iter()
                .map(|log| (&log.key, &log.log_id, &log.description, &log.url, &log.state))
                .chain(operator.tiled_logs.iter().map(|log| {
                    (
                        &log.key,
                        &log.log_id,
                        &log.description,
                        &log.submission_url,
                        &log.state,
                    )
                }));

            for (key, log_id, description, url, state) in entries {
                let Some(state) = state.as_ref().filter(|s| s.is_trusted()) else {
                    tracing::debug!(
                        log_id = %log_id,
                        operator = %operator.name,
                        "Skipping log without a trusted state"
                    );
                    continue;
                };

                let mut server = LogServer::from_base64_key(key, state.valid_until()?)?;
                check_log_id(log_id, &server)?;

                if let Some(description) = description {
                    server = server.with_description(description.clone());
                }
                if let Some(url) = url {
                    server = server.with_url(url.clone());
                }
                servers.push(server);
            }
        }

        if servers.is_empty() {
            return Err(Error::NoLogServers);
        }

        tracing::debug!("Loaded {} log servers", servers.len());
        Ok(Self { servers })
    }

    pub fn servers(&self) -> &[LogServer] {
        &self.servers
    }

    pub fn into_servers(self) -> Vec<LogServer> {
        self.servers
    }
}

fn check_log_id(published: &str, server: &LogServer) -> Result<()> {
    let expected = base64::engine::general_purpose::STANDARD.decode(published.trim())?;
    if expected.as_slice() != server.id().as_bytes() {
        return Err(Error::LogIdMismatch {
            expected: published.to_string(),
            actual: server.id().to_base64(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_deserialization() {
        let state: LogState =
            serde_json::from_str(r#"{"retired": {"timestamp": "2020-01-01T00:00:00Z"}}"#).unwrap();
        assert!(matches!(state, LogState::Retired(_)));
        assert_eq!(state.valid_until().unwrap(), Some(1_577_836_800_000));

        let state: LogState =
            serde_json::from_str(r#"{"readonly": {"timestamp": "2020-01-01T00:00:01Z", "final_tree_head": {"sha256_root_hash": "", "tree_size": 1}}}"#)
                .unwrap();
        assert_eq!(state.valid_until().unwrap(), Some(1_577_836_801_000));

        let state: LogState =
            serde_json::from_str(r#"{"usable": {"timestamp": "2020-01-01T00:00:00Z"}}"#).unwrap();
        assert_eq!(state.valid_until().unwrap(), None);
        assert!(state.is_trusted());
    }

    #[test]
    fn test_untrusted_states() {
        let ts = StateTimestamp {
            timestamp: "2020-01-01T00:00:00Z".to_string(),
        };
        assert!(!LogState::Pending(ts.clone()).is_trusted());
        assert!(!LogState::Rejected(ts.clone()).is_trusted());
        assert!(LogState::Qualified(ts).is_trusted());
    }

    #[test]
    fn test_bad_timestamp() {
        let state = LogState::Retired(StateTimestamp {
            timestamp: "yesterday".to_string(),
        });
        assert!(matches!(state.valid_until(), Err(Error::TimeParse(_))));
    }

    #[test]
    fn test_empty_list() {
        let err = LogList::from_json(r#"{"operators": []}"#).unwrap_err();
        assert!(matches!(err, Error::NoLogServers));
    }

    #[test]
    fn test_malformed_json() {
        let err = LogList::from_json("{").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
