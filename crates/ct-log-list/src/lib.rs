//! Trusted Certificate Transparency logs
//!
//! This crate provides [`LogServer`], the [`LogListProvider`] trait through
//! which the verifier obtains its trusted logs, a parser for the published
//! v3 `log_list.json`, and providers that serve a fixed list or cache another
//! provider with single-flight refresh.
//!
//! Fetching the list over the network and checking its signature are left to
//! the caller's own [`LogListProvider`] implementation.

pub mod cache;
pub mod error;
pub mod log_list;
pub mod log_server;
pub mod provider;

pub use cache::{CachedLogListProvider, DEFAULT_TTL};
pub use error::{Error, Result};
pub use log_list::{LogList, LogListJson, LogState};
pub use log_server::LogServer;
pub use provider::{LogListProvider, StaticLogListProvider};
