use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot file not found: {0}")]
    SnapshotFileNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
