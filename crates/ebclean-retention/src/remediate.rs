use ebclean_platform::{Platform, VersionRecord};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionStatus {
    Deleted,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    pub label: String,
    #[serde(flatten)]
    pub status: DeletionStatus,
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        self.status == DeletionStatus::Deleted
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemediationSummary {
    pub deleted: usize,
    pub failed: usize,
}

impl RemediationSummary {
    pub fn from_outcomes(outcomes: &[DeletionOutcome]) -> Self {
        let deleted = outcomes.iter().filter(|o| o.is_deleted()).count();
        Self {
            deleted,
            failed: outcomes.len() - deleted,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Deletes each disposable version in order.
///
/// A failed deletion is recorded and the loop moves on to the next version.
pub async fn remediate(
    platform: &dyn Platform,
    application: &str,
    disposable: &[VersionRecord],
    delete_source_bundle: bool,
) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::with_capacity(disposable.len());

    for version in disposable {
        let status = match platform
            .delete_version(application, &version.label, delete_source_bundle)
            .await
        {
            Ok(()) => {
                info!(
                    "Deleted version {} of {} (source bundle deleted: {})",
                    version.label, application, delete_source_bundle
                );
                DeletionStatus::Deleted
            }
            Err(e) => {
                error!(
                    "Failed to delete version {} of {}: {}",
                    version.label, application, e
                );
                DeletionStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        outcomes.push(DeletionOutcome {
            label: version.label.clone(),
            status,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use ebclean_platform::{EnvironmentRecord, PlatformError, Result};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlatform {
        failing: Vec<&'static str>,
        calls: Mutex<Vec<(String, String, bool)>>,
    }

    #[async_trait]
    impl Platform for RecordingPlatform {
        async fn fetch_versions(&self, _application: &str) -> Result<Vec<VersionRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_environments(&self, _application: &str) -> Result<Vec<EnvironmentRecord>> {
            Ok(Vec::new())
        }

        async fn delete_version(
            &self,
            application: &str,
            label: &str,
            delete_source_bundle: bool,
        ) -> Result<()> {
            self.calls.lock().await.push((
                application.to_string(),
                label.to_string(),
                delete_source_bundle,
            ));

            if self.failing.iter().any(|f| *f == label) {
                return Err(PlatformError::DeleteVersion {
                    label: label.to_string(),
                    message: "OperationInProgressFailure: version is being processed".into(),
                });
            }

            Ok(())
        }
    }

    fn versions(labels: &[&str]) -> Vec<VersionRecord> {
        labels
            .iter()
            .map(|l| VersionRecord::new("billing", *l, Utc::now()))
            .collect()
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_remaining_deletions() {
        let platform = RecordingPlatform {
            failing: vec!["B"],
            ..Default::default()
        };

        let outcomes = remediate(&platform, "billing", &versions(&["A", "B", "C"]), true).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].label, "A");
        assert_eq!(outcomes[0].status, DeletionStatus::Deleted);
        assert_eq!(outcomes[1].label, "B");
        match &outcomes[1].status {
            DeletionStatus::Failed { reason } => {
                assert!(reason.contains("OperationInProgressFailure"));
                assert!(reason.contains("B"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(outcomes[2].label, "C");
        assert_eq!(outcomes[2].status, DeletionStatus::Deleted);

        let calls = platform.calls.lock().await;
        let labels: Vec<_> = calls.iter().map(|(_, l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!(calls.iter().all(|(app, _, bundle)| app == "billing" && *bundle));
    }

    #[tokio::test]
    async fn test_empty_list_makes_no_calls() {
        let platform = RecordingPlatform::default();

        let outcomes = remediate(&platform, "billing", &[], false).await;

        assert!(outcomes.is_empty());
        assert!(platform.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_source_bundle_flag_is_forwarded() {
        let platform = RecordingPlatform::default();

        remediate(&platform, "billing", &versions(&["v1"]), false).await;

        let calls = platform.calls.lock().await;
        assert_eq!(calls[0], ("billing".into(), "v1".into(), false));
    }

    #[test]
    fn test_summary() {
        let outcomes = vec![
            DeletionOutcome {
                label: "a".into(),
                status: DeletionStatus::Deleted,
            },
            DeletionOutcome {
                label: "b".into(),
                status: DeletionStatus::Failed {
                    reason: "denied".into(),
                },
            },
        ];

        let summary = RemediationSummary::from_outcomes(&outcomes);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        assert!(!RemediationSummary::default().has_failures());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = DeletionOutcome {
            label: "b".into(),
            status: DeletionStatus::Failed {
                reason: "denied".into(),
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "b", "status": "failed", "reason": "denied"})
        );
    }
}
