use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The three platform operations the retention workflow needs.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn fetch_versions(&self, application: &str) -> Result<Vec<VersionRecord>>;

    async fn fetch_environments(&self, application: &str) -> Result<Vec<EnvironmentRecord>>;

    async fn delete_version(
        &self,
        application: &str,
        label: &str,
        delete_source_bundle: bool,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub application: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_bundle: Option<SourceBundle>,
}

impl VersionRecord {
    pub fn new(
        application: impl Into<String>,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            application: application.into(),
            label: label.into(),
            created_at,
            description: None,
            status: None,
            source_bundle: None,
        }
    }
}

/// Location of the stored artifact backing a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBundle {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for SourceBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentRecord {
    pub name: String,
    /// Label of the version currently deployed, if any.
    pub version_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EnvironmentRecord {
    pub fn new(name: impl Into<String>, version_label: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version_label: version_label.map(str::to_string),
            status: None,
        }
    }
}
