//! HTTP feed client for pulling snapshots and webhook notifier for pushing alerts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lexwatch_core::{DocumentSnapshot, ImpactLevel, SourceConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::{Acquisition, Notifier, SyncError};

/// Pulls snapshots from a source's JSON feed.
///
/// `GET {feed_url}?as_of=<rfc3339>` must return a JSON array of snapshots.
/// Untagged snapshots take the configured source id; a snapshot tagged with
/// a different source fails the whole fetch.
#[derive(Default)]
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

fn feed_url(base: &str, as_of: DateTime<Utc>) -> String {
    let base = base.trim_end_matches('/');
    let sep = if base.contains('?') { '&' } else { '?' };
    format!(
        "{base}{sep}as_of={}",
        as_of.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )
}

#[async_trait]
impl Acquisition for FeedClient {
    async fn fetch_snapshots(
        &self,
        source: &SourceConfig,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<DocumentSnapshot>, SyncError> {
        let url = feed_url(&source.feed_url, as_of);

        info!(url = %url, source = %source.id, "pulling snapshots from feed");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let mut snapshots: Vec<DocumentSnapshot> = resp.json().await?;
        for snap in &mut snapshots {
            if snap.source_id.is_empty() {
                snap.source_id.clone_from(&source.id);
            } else if snap.source_id != source.id {
                return Err(SyncError::Acquisition {
                    source_id: source.id.clone(),
                    reason: format!(
                        "snapshot {} is tagged with source {}",
                        snap.id, snap.source_id
                    ),
                });
            }
        }
        info!(count = snapshots.len(), source = %source.id, "pulled snapshots");
        Ok(snapshots)
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    recipients: &'a [String],
    summary: &'a str,
    detail: &'a str,
    priority: ImpactLevel,
}

/// Posts notifications as JSON to a webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        recipients: &[String],
        summary: &str,
        detail: &str,
        priority: ImpactLevel,
    ) -> Result<bool, SyncError> {
        let payload = WebhookPayload {
            recipients,
            summary,
            detail,
            priority,
        };

        info!(url = %self.url, priority = %priority, "posting notification");
        let resp = self.client.post(&self.url).json(&payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "notification rejected");
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(feed_url: String) -> SourceConfig {
        SourceConfig {
            id: "fda_us".into(),
            name: "FDA".into(),
            feed_url,
            download_interval_hours: 24,
            region: "US".into(),
            enabled: true,
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn feed_url_appends_as_of() {
        assert_eq!(
            feed_url("http://localhost:4000/feed/", as_of()),
            "http://localhost:4000/feed?as_of=2024-06-01T12:00:00Z"
        );
        assert_eq!(
            feed_url("http://localhost:4000/feed?lang=en", as_of()),
            "http://localhost:4000/feed?lang=en&as_of=2024-06-01T12:00:00Z"
        );
    }

    #[tokio::test]
    async fn fetch_tags_missing_source_id() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "id": "fda_us_7",
                "source_id": "",
                "document_id": "doc-7",
                "title": "Cybersecurity Guidance - Rev 2",
                "content": "Section 1\nSection 2",
                "original_date": "2024-05-01T00:00:00Z",
                "downloaded_at": "2024-06-01T12:00:00Z"
            }
        ]);
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(query_param("as_of", "2024-06-01T12:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = FeedClient::new();
        let snapshots = client
            .fetch_snapshots(&source(format!("{}/feed", server.uri())), as_of())
            .await
            .unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].source_id, "fda_us");
        assert_eq!(snapshots[0].content, "Section 1\nSection 2");
    }

    #[tokio::test]
    async fn fetch_rejects_foreign_source() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "id": "ema_eu_3",
                "source_id": "ema_eu",
                "document_id": "doc-3",
                "title": "MDR Guidance - Update 3",
                "original_date": "2024-05-01T00:00:00Z",
                "downloaded_at": "2024-06-01T12:00:00Z"
            }
        ]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = FeedClient::new()
            .fetch_snapshots(&source(server.uri()), as_of())
            .await
            .unwrap_err();
        match err {
            SyncError::Acquisition { source_id, reason } => {
                assert_eq!(source_id, "fda_us");
                assert!(reason.contains("ema_eu_3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = FeedClient::new()
            .fetch_snapshots(&source(server.uri()), as_of())
            .await
            .unwrap_err();
        match err {
            SyncError::Server { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn webhook_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "summary": "2 high-impact change(s) detected for FDA",
                "priority": "high"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hook", server.uri()));
        let delivered = notifier
            .notify(
                &["ra@example.com".into()],
                "2 high-impact change(s) detected for FDA",
                "detail",
                ImpactLevel::High,
            )
            .await
            .unwrap();
        assert!(delivered);
    }

    #[tokio::test]
    async fn webhook_rejection_is_not_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri());
        let delivered = notifier
            .notify(&[], "summary", "detail", ImpactLevel::Critical)
            .await
            .unwrap();
        assert!(!delivered);
    }
}
