use async_trait::async_trait;
use lexwatch_core::ImpactLevel;
use tracing::warn;

use crate::{Notifier, SyncError};

/// Notifier that writes notifications to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        recipients: &[String],
        summary: &str,
        detail: &str,
        priority: ImpactLevel,
    ) -> Result<bool, SyncError> {
        warn!(
            priority = %priority,
            recipients = recipients.len(),
            summary,
            detail,
            "change notification"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_delivers() {
        let delivered = LogNotifier
            .notify(&["qa@example.com".into()], "1 change", "detail", ImpactLevel::High)
            .await
            .unwrap();
        assert!(delivered);
    }
}
