//! JSON snapshot files for offline runs.

use std::path::Path;

use lexwatch_core::DocumentSnapshot;
use tracing::info;

use crate::StoreError;

/// Read a JSON array of snapshots.
pub fn load_snapshots(path: &Path) -> Result<Vec<DocumentSnapshot>, StoreError> {
    if !path.exists() {
        return Err(StoreError::SnapshotFileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    let snapshots: Vec<DocumentSnapshot> = serde_json::from_str(&text)?;
    info!(path = %path.display(), count = snapshots.len(), "loaded snapshots");
    Ok(snapshots)
}

/// Write snapshots as a pretty-printed JSON array, replacing any existing file.
pub fn save_snapshots(path: &Path, snapshots: &[DocumentSnapshot]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(snapshots)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), count = snapshots.len(), "saved snapshots");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("snapshots.json");
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut snap = DocumentSnapshot::new("ema_eu_1", "ema_eu", "MDR Guidance - Update 1", "Line A", date);
        snap.device_classes = vec!["IIa".into(), "III".into()];

        save_snapshots(&path, &[snap.clone()]).unwrap();
        let loaded = load_snapshots(&path).unwrap();
        assert_eq!(loaded, vec![snap]);
    }

    #[test]
    fn missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_snapshots(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::SnapshotFileNotFound(_)));
    }

    #[test]
    fn malformed_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_snapshots(&path), Err(StoreError::Json(_))));
    }
}
