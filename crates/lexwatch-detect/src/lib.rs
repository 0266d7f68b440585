//! Change detection: version grouping, line-level comparison, rule-based classification.

pub mod classifier;
pub mod comparator;
pub mod grouper;
pub mod pipeline;
pub mod stakeholders;

pub use classifier::{Classifier, MINOR_CHANGES, categorize_change_type};
pub use comparator::compare;
pub use grouper::{VersionChain, group_versions};
pub use pipeline::detect_changes;
