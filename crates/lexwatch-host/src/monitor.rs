//! Periodic acquisition and detection per source, with an explicit stop handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lexwatch_core::{ChangeDetection, ImpactLevel, MonitorConfig, SourceConfig};
use lexwatch_store::{HistoryStore, MemoryStore};
use lexwatch_sync::{Acquisition, Notifier};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::service::HistoryService;

/// Outcome of one tick for one source.
#[derive(Debug, Default)]
pub struct TickReport {
    pub source_id: String,
    /// Snapshots returned by acquisition. Zero when acquisition failed.
    pub fetched: usize,
    /// Snapshots not previously stored.
    pub ingested: usize,
    pub changes: Vec<ChangeDetection>,
    pub acquisition_failed: bool,
    /// `Some(delivered)` when a notification was attempted.
    pub notified: Option<bool>,
}

impl TickReport {
    /// Records at `high` or `critical` impact.
    pub fn alerts(&self) -> impl Iterator<Item = &ChangeDetection> {
        self.changes
            .iter()
            .filter(|c| c.impact_assessment.is_alerting())
    }
}

/// Drives acquisition → detection → notification for each configured source.
pub struct Monitor<S = MemoryStore> {
    service: Arc<HistoryService<S>>,
    acquisition: Arc<dyn Acquisition>,
    notifier: Arc<dyn Notifier>,
    sources: Vec<SourceConfig>,
    recipients: Vec<String>,
}

impl<S: HistoryStore + 'static> Monitor<S> {
    pub fn new(
        service: Arc<HistoryService<S>>,
        acquisition: Arc<dyn Acquisition>,
        notifier: Arc<dyn Notifier>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            service,
            acquisition,
            notifier,
            sources: config.enabled_sources().cloned().collect(),
            recipients: config.recipients.clone(),
        }
    }

    pub fn service(&self) -> &Arc<HistoryService<S>> {
        &self.service
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Run one tick for one source: acquire, ingest, detect, notify.
    ///
    /// Acquisition failure is logged and treated as zero new snapshots.
    /// Notification failure is logged; recorded changes stay in the ledger.
    pub async fn tick(&self, source: &SourceConfig, as_of: DateTime<Utc>) -> TickReport {
        let mut report = TickReport {
            source_id: source.id.clone(),
            ..TickReport::default()
        };

        match self.acquisition.fetch_snapshots(source, as_of).await {
            Ok(snapshots) => {
                report.fetched = snapshots.len();
                report.ingested = self.service.ingest(snapshots).await;
            }
            Err(e) => {
                warn!(source = %source.id, error = %e, "acquisition failed");
                report.acquisition_failed = true;
            }
        }

        report.changes = self.service.detect_changes_for(&source.id).await;

        let alerts: Vec<&ChangeDetection> = report.alerts().collect();
        if !alerts.is_empty() {
            let summary = format!(
                "{} high-impact change(s) detected for {}",
                alerts.len(),
                source.name
            );
            let detail = alert_detail(&alerts);
            let delivered = match self
                .notifier
                .notify(&self.recipients, &summary, &detail, ImpactLevel::High)
                .await
            {
                Ok(delivered) => delivered,
                Err(e) => {
                    warn!(source = %source.id, error = %e, "notification failed");
                    false
                }
            };
            if !delivered {
                warn!(source = %source.id, alerts = alerts.len(), "notification not delivered");
            }
            report.notified = Some(delivered);
        }

        info!(
            source = %source.id,
            fetched = report.fetched,
            ingested = report.ingested,
            changes = report.changes.len(),
            "monitor tick complete"
        );
        report
    }

    /// Tick every source once, in configuration order.
    pub async fn tick_all(&self, as_of: DateTime<Utc>) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            reports.push(self.tick(source, as_of).await);
        }
        reports
    }

    /// Spawn one task per source. Each task ticks immediately, then sleeps
    /// for the source's interval after every completed tick.
    pub fn start(self: Arc<Self>) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::with_capacity(self.sources.len());

        for source in self.sources.clone() {
            let monitor = Arc::clone(&self);
            let mut shutdown = shutdown_rx.clone();
            tasks.push(tokio::spawn(async move {
                let interval = source.download_interval();
                info!(source = %source.id, hours = source.download_interval_hours, "monitor started");
                loop {
                    if *shutdown.borrow() {
                        break;
                    }
                    monitor.tick(&source, Utc::now()).await;
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = shutdown.changed() => break,
                    }
                }
                info!(source = %source.id, "monitor stopped");
            }));
        }

        MonitorHandle { shutdown_tx, tasks }
    }
}

/// Title line plus change statements for each alerting record.
fn alert_detail(alerts: &[&ChangeDetection]) -> String {
    let mut lines = Vec::new();
    for change in alerts {
        lines.push(format!(
            "{} [{}]",
            change.document_title, change.impact_assessment
        ));
        for statement in &change.changes_summary {
            lines.push(format!("  - {statement}"));
        }
    }
    lines.join("\n")
}

/// Stop handle for a started [`Monitor`].
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal shutdown and wait for every source task to exit. An in-flight
    /// tick runs to completion first.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "monitor task ended abnormally");
            }
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
