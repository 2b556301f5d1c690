mod classify;
mod manager;
mod remediate;
pub mod report;

pub use classify::{Classification, ClassificationResult, ClassifiedVersion, classify};
pub use manager::{CleanReport, RetentionManager, RetentionPolicy};
pub use remediate::{DeletionOutcome, DeletionStatus, RemediationSummary, remediate};
