//! Host layer: the history service facade and the per-source monitoring loop.
//!
//! [`HistoryService`] serialises access to the snapshot store and change
//! ledger. [`Monitor`] drives acquisition, detection and notification on a
//! fixed interval per source and is stopped through its [`MonitorHandle`].

mod monitor;
mod service;

pub use monitor::{Monitor, MonitorHandle, TickReport};
pub use service::HistoryService;
