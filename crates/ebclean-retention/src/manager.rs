use crate::classify::{ClassificationResult, classify};
use crate::remediate::{DeletionOutcome, RemediationSummary, remediate};
use chrono::{DateTime, Utc};
use ebclean_platform::{Platform, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Minimum age in days before an unreferenced version may be deleted.
    pub retention_days: u32,
    pub delete_source_bundle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub classification: ClassificationResult,
    pub outcomes: Vec<DeletionOutcome>,
}

impl CleanReport {
    pub fn summary(&self) -> RemediationSummary {
        RemediationSummary::from_outcomes(&self.outcomes)
    }
}

pub struct RetentionManager {
    platform: Arc<dyn Platform>,
}

impl RetentionManager {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Fetches versions and environments and classifies them. Nothing is mutated.
    pub async fn inspect(
        &self,
        application: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> Result<ClassificationResult> {
        info!(
            "Inspecting application {} (retention: {} day(s))",
            application, policy.retention_days
        );

        let versions = self.platform.fetch_versions(application).await?;
        let environments = self.platform.fetch_environments(application).await?;

        let result = classify(&versions, &environments, policy.retention_days, now);

        info!(
            "Application {}: {} version(s), {} disposable",
            application,
            result.versions.len(),
            result.disposable_count()
        );

        Ok(result)
    }

    /// Inspects the application, then deletes every disposable version.
    ///
    /// Fetch errors are returned before any deletion is attempted. Deletion
    /// failures are reported per version in the returned outcomes.
    pub async fn clean(
        &self,
        application: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> Result<CleanReport> {
        let classification = self.inspect(application, policy, now).await?;
        let disposable = classification.disposable();

        if disposable.is_empty() {
            info!("No version of {} can be deleted", application);
            return Ok(CleanReport {
                classification,
                outcomes: Vec::new(),
            });
        }

        let outcomes = remediate(
            self.platform.as_ref(),
            application,
            &disposable,
            policy.delete_source_bundle,
        )
        .await;

        let summary = RemediationSummary::from_outcomes(&outcomes);
        info!(
            "Cleanup of {} complete: {} deleted, {} failed",
            application, summary.deleted, summary.failed
        );

        Ok(CleanReport {
            classification,
            outcomes,
        })
    }
}
