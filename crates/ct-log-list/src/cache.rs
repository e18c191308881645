//! TTL cache with single-flight refresh around a log list provider

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::log_server::LogServer;
use crate::provider::LogListProvider;

/// Default time a fetched list stays fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cached snapshot with expiration time
#[derive(Debug, Clone)]
struct CacheEntry {
    servers: Arc<[LogServer]>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct State {
    entry: Option<CacheEntry>,
    in_flight: bool,
    /// Bumped each time a fetch completes
    generation: u64,
    /// Outcome of the most recent fetch, handed to callers that waited on it
    last_outcome: Option<std::result::Result<Arc<[LogServer]>, String>>,
}

/// Wraps a provider, caching its last good result for a TTL
///
/// At most one fetch runs at a time. Callers arriving while a fetch is in
/// progress block until it completes and all receive its outcome, success or
/// failure. A failed fetch leaves no entry behind, so the next call retries.
pub struct CachedLogListProvider<P> {
    inner: P,
    ttl: Duration,
    state: Mutex<State>,
    fetched: Condvar,
}

impl<P: LogListProvider> CachedLogListProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            state: Mutex::new(State::default()),
            fetched: Condvar::new(),
        }
    }

    /// Drop the cached snapshot so the next call fetches
    pub fn invalidate(&self) {
        self.lock().entry = None;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetch(&self) -> Result<Arc<[LogServer]>> {
        let mut guard = FlightGuard {
            provider: self,
            outcome: None,
        };
        let result = self.inner.log_servers();
        guard.outcome = Some(match &result {
            Ok(servers) => Ok(Arc::clone(servers)),
            Err(e) => Err(e.to_string()),
        });
        drop(guard);
        result
    }
}

/// Publishes the fetch outcome and wakes waiters, even if the fetch panicked
struct FlightGuard<'a, P> {
    provider: &'a CachedLogListProvider<P>,
    outcome: Option<std::result::Result<Arc<[LogServer]>, String>>,
}

impl<P> Drop for FlightGuard<'_, P> {
    fn drop(&mut self) {
        let mut state = self
            .provider
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| Err("log list fetch panicked".to_string()));
        if let Ok(servers) = &outcome {
            state.entry = Some(CacheEntry {
                servers: Arc::clone(servers),
                expires_at: Instant::now() + self.provider.ttl,
            });
        }
        state.in_flight = false;
        state.generation += 1;
        state.last_outcome = Some(outcome);
        self.provider.fetched.notify_all();
    }
}

impl<P: LogListProvider> LogListProvider for CachedLogListProvider<P> {
    fn log_servers(&self) -> Result<Arc<[LogServer]>> {
        let mut state = self.lock();

        if let Some(entry) = state.entry.as_ref().filter(|e| !e.is_expired()) {
            return Ok(Arc::clone(&entry.servers));
        }

        if state.in_flight {
            let generation = state.generation;
            tracing::debug!("Waiting for in-flight log list fetch");
            while state.generation == generation {
                state = self
                    .fetched
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            return match &state.last_outcome {
                Some(Ok(servers)) => Ok(Arc::clone(servers)),
                Some(Err(reason)) => Err(Error::Fetch(reason.clone())),
                None => Err(Error::Fetch("no fetch outcome recorded".to_string())),
            };
        }

        state.in_flight = true;
        drop(state);

        tracing::debug!("Fetching log list");
        self.fetch()
    }
}
