pub mod change;
pub mod checksum;
pub mod config;
pub mod document;
pub mod grouping;

pub use change::{ChangeDetection, ChangeType, DetailedComparison, ImpactLevel};
pub use checksum::content_checksum;
pub use config::{ChangeTypeMode, ConfigError, MonitorConfig, SourceConfig};
pub use document::{DocumentMetadata, DocumentSnapshot, STATUS_ARCHIVED};
pub use grouping::{grouping_key, title_key};
