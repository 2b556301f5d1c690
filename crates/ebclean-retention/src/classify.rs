use chrono::{DateTime, Duration, Utc};
use ebclean_platform::{EnvironmentRecord, VersionRecord};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    InUse,
    TooYoung,
    Disposable,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::InUse => "in_use",
            Classification::TooYoung => "too_young",
            Classification::Disposable => "disposable",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedVersion {
    pub version: VersionRecord,
    pub classification: Classification,
    /// Environments running this version; empty unless `InUse`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub versions: Vec<ClassifiedVersion>,
}

impl ClassificationResult {
    /// Disposable versions in input order.
    pub fn disposable(&self) -> Vec<VersionRecord> {
        self.versions
            .iter()
            .filter(|v| v.classification == Classification::Disposable)
            .map(|v| v.version.clone())
            .collect()
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.versions
            .iter()
            .filter(|v| v.classification == classification)
            .count()
    }

    pub fn disposable_count(&self) -> usize {
        self.count(Classification::Disposable)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Tags every version as in use, too young, or disposable.
///
/// A version is in use when any environment runs its label. Otherwise it is
/// disposable once `now - created_at` reaches `retention_days` days; the
/// boundary counts as disposable. A zero-day window disposes every
/// unreferenced version, including ones dated ahead of `now`. Output
/// preserves the order of `versions`.
/// Labels are assumed unique within the list.
pub fn classify(
    versions: &[VersionRecord],
    environments: &[EnvironmentRecord],
    retention_days: u32,
    now: DateTime<Utc>,
) -> ClassificationResult {
    let mut active: HashMap<&str, Vec<String>> = HashMap::new();
    for environment in environments {
        if let Some(label) = environment.version_label.as_deref() {
            active
                .entry(label)
                .or_default()
                .push(environment.name.clone());
        }
    }

    let window = Duration::days(i64::from(retention_days));

    let versions = versions
        .iter()
        .map(|version| {
            let (classification, environments) = match active.get(version.label.as_str()) {
                Some(names) => (Classification::InUse, names.clone()),
                None if retention_days == 0 || now - version.created_at >= window => {
                    (Classification::Disposable, Vec::new())
                }
                None => (Classification::TooYoung, Vec::new()),
            };

            ClassifiedVersion {
                version: version.clone(),
                classification,
                environments,
            }
        })
        .collect();

    ClassificationResult { versions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(label: &str, age: Duration, now: DateTime<Utc>) -> VersionRecord {
        VersionRecord::new("billing", label, now - age)
    }

    fn tags(result: &ClassificationResult) -> Vec<(&str, Classification)> {
        result
            .versions
            .iter()
            .map(|v| (v.version.label.as_str(), v.classification))
            .collect()
    }

    #[test]
    fn test_referenced_old_version_is_in_use() {
        let now = Utc::now();
        let versions = vec![
            version("v1", Duration::days(40), now),
            version("v2", Duration::days(10), now),
        ];
        let environments = vec![EnvironmentRecord::new("env1", Some("v1"))];

        let result = classify(&versions, &environments, 30, now);

        assert_eq!(
            tags(&result),
            vec![
                ("v1", Classification::InUse),
                ("v2", Classification::TooYoung)
            ]
        );
        assert_eq!(result.versions[0].environments, vec!["env1".to_string()]);
        assert!(result.disposable().is_empty());
    }

    #[test]
    fn test_unreferenced_old_version_is_disposable() {
        let now = Utc::now();
        let versions = vec![
            version("v1", Duration::days(40), now),
            version("v2", Duration::days(10), now),
        ];

        let result = classify(&versions, &[], 30, now);

        assert_eq!(
            tags(&result),
            vec![
                ("v1", Classification::Disposable),
                ("v2", Classification::TooYoung)
            ]
        );
        assert_eq!(result.disposable(), vec![versions[0].clone()]);
    }

    #[test]
    fn test_exact_boundary_is_disposable() {
        let now = Utc::now();
        let versions = vec![
            version("edge", Duration::days(30), now),
            version("inside", Duration::days(30) - Duration::seconds(1), now),
        ];

        let result = classify(&versions, &[], 30, now);

        assert_eq!(
            tags(&result),
            vec![
                ("edge", Classification::Disposable),
                ("inside", Classification::TooYoung)
            ]
        );
    }

    #[test]
    fn test_zero_retention_disposes_every_unreferenced_version() {
        let now = Utc::now();
        let versions = vec![
            version("fresh", Duration::zero(), now),
            version("live", Duration::days(400), now),
            version("hour", Duration::hours(1), now),
        ];
        let environments = vec![EnvironmentRecord::new("prod", Some("live"))];

        let result = classify(&versions, &environments, 0, now);

        assert_eq!(
            tags(&result),
            vec![
                ("fresh", Classification::Disposable),
                ("live", Classification::InUse),
                ("hour", Classification::Disposable)
            ]
        );
    }

    #[test]
    fn test_in_use_wins_regardless_of_age() {
        let now = Utc::now();
        let versions = vec![version("ancient", Duration::days(3650), now)];
        let environments = vec![
            EnvironmentRecord::new("prod", Some("ancient")),
            EnvironmentRecord::new("staging", Some("ancient")),
        ];

        let result = classify(&versions, &environments, 1, now);

        assert_eq!(result.versions[0].classification, Classification::InUse);
        assert_eq!(
            result.versions[0].environments,
            vec!["prod".to_string(), "staging".to_string()]
        );
        assert_eq!(result.disposable_count(), 0);
    }

    #[test]
    fn test_environment_without_version_references_nothing() {
        let now = Utc::now();
        let versions = vec![version("v1", Duration::days(90), now)];
        let environments = vec![EnvironmentRecord::new("launching", None)];

        let result = classify(&versions, &environments, 30, now);

        assert_eq!(result.versions[0].classification, Classification::Disposable);
    }

    #[test]
    fn test_future_creation_date_is_too_young() {
        let now = Utc::now();
        let versions = vec![VersionRecord::new("billing", "skewed", now + Duration::hours(2))];

        let result = classify(&versions, &[], 30, now);

        assert_eq!(result.versions[0].classification, Classification::TooYoung);
    }

    #[test]
    fn test_zero_window_disposes_future_dated_version() {
        let now = Utc::now();
        let versions = vec![VersionRecord::new("billing", "skewed", now + Duration::seconds(5))];

        let result = classify(&versions, &[], 0, now);

        assert_eq!(result.versions[0].classification, Classification::Disposable);
        assert_eq!(result.disposable(), versions);
    }

    #[test]
    fn test_empty_versions() {
        let environments = vec![EnvironmentRecord::new("prod", Some("v1"))];
        let result = classify(&[], &environments, 30, Utc::now());
        assert!(result.is_empty());
        assert!(result.disposable().is_empty());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let now = Utc::now();
        let versions: Vec<_> = (0..20)
            .map(|i| version(&format!("v{i}"), Duration::days(i * 5), now))
            .collect();
        let environments = vec![
            EnvironmentRecord::new("prod", Some("v3")),
            EnvironmentRecord::new("staging", Some("v17")),
        ];

        let first = classify(&versions, &environments, 30, now);
        let second = classify(&versions, &environments, 30, now);

        assert_eq!(first, second);
        assert_eq!(first.count(Classification::InUse), 2);
        assert_eq!(
            first.count(Classification::TooYoung) + first.disposable_count(),
            18
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let now = Utc::now();
        let labels = ["c", "a", "d", "b"];
        let versions: Vec<_> = labels
            .iter()
            .map(|l| version(l, Duration::days(100), now))
            .collect();

        let result = classify(&versions, &[], 30, now);
        let out: Vec<_> = result.disposable().into_iter().map(|v| v.label).collect();

        assert_eq!(out, labels);
    }
}
