//! Sync layer: acquisition of document snapshots and delivery of change notifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lexwatch_core::{DocumentSnapshot, ImpactLevel, SourceConfig};
use thiserror::Error;

mod log;
pub use log::LogNotifier;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{FeedClient, WebhookNotifier};

#[derive(Error, Debug)]
pub enum SyncError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("acquisition failed for {source_id}: {reason}")]
    Acquisition { source_id: String, reason: String },
}

/// Supplies fresh document snapshots for a source.
///
/// Implementations tag each snapshot with its `source_id`, `original_date`,
/// `downloaded_at`, and metadata.
#[async_trait]
pub trait Acquisition: Send + Sync {
    async fn fetch_snapshots(
        &self,
        source: &SourceConfig,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<DocumentSnapshot>, SyncError>;
}

/// Delivers a change notification. Best-effort: `Ok(false)` means the
/// notification was not delivered.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipients: &[String],
        summary: &str,
        detail: &str,
        priority: ImpactLevel,
    ) -> Result<bool, SyncError>;
}
