//! Sources of trusted log servers

use crate::error::Result;
use crate::log_list::LogList;
use crate::log_server::LogServer;
use std::sync::Arc;

/// Supplies the current set of trusted logs
///
/// Implementations may block (for example to fetch and verify a remote log
/// list). Each call returns a snapshot; callers never see a list change
/// underneath them.
pub trait LogListProvider: Send + Sync {
    fn log_servers(&self) -> Result<Arc<[LogServer]>>;
}

/// A provider that always returns the same logs
#[derive(Debug, Clone)]
pub struct StaticLogListProvider {
    servers: Arc<[LogServer]>,
}

impl StaticLogListProvider {
    pub fn new(servers: impl Into<Vec<LogServer>>) -> Self {
        let servers: Vec<LogServer> = servers.into();
        Self {
            servers: servers.into(),
        }
    }
}

impl From<LogList> for StaticLogListProvider {
    fn from(list: LogList) -> Self {
        Self::new(list.into_servers())
    }
}

impl LogListProvider for StaticLogListProvider {
    fn log_servers(&self) -> Result<Arc<[LogServer]>> {
        Ok(Arc::clone(&self.servers))
    }
}

impl<P: LogListProvider + ?Sized> LogListProvider for Arc<P> {
    fn log_servers(&self) -> Result<Arc<[LogServer]>> {
        (**self).log_servers()
    }
}
