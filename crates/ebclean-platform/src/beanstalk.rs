use crate::provider::{EnvironmentRecord, Platform, SourceBundle, VersionRecord};
use crate::{PlatformError, Result};
use async_trait::async_trait;
use aws_sdk_elasticbeanstalk::Client;
use aws_sdk_elasticbeanstalk::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_elasticbeanstalk::primitives::DateTime as AwsDateTime;
use aws_sdk_elasticbeanstalk::types::{ApplicationVersionDescription, EnvironmentDescription};
use chrono::{DateTime, Utc};
use ebclean_config::constants;
use tracing::debug;

/// Connection settings for the Elastic Beanstalk client, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub region: String,
    /// Custom endpoint, e.g. a localstack instance.
    pub endpoint_url: Option<String>,
}

pub struct BeanstalkPlatform {
    client: Client,
}

impl BeanstalkPlatform {
    /// Builds a client from the standard AWS credential chain and the given region.
    pub async fn new(config: &PlatformConfig) -> Self {
        let sdk_config = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut eb_config = aws_sdk_elasticbeanstalk::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = &config.endpoint_url {
            eb_config = eb_config.endpoint_url(endpoint_url);
        }

        Self {
            client: Client::from_conf(eb_config.build()),
        }
    }
}

#[async_trait]
impl Platform for BeanstalkPlatform {
    async fn fetch_versions(&self, application: &str) -> Result<Vec<VersionRecord>> {
        let mut versions = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .describe_application_versions()
                .application_name(application)
                .max_records(constants::DESCRIBE_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| PlatformError::FetchVersions {
                    application: application.to_string(),
                    message: describe_sdk_error(&e),
                })?;

            for description in output.application_versions() {
                versions.push(version_record(application, description)?);
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!("Fetched {} version(s) of {}", versions.len(), application);

        Ok(versions)
    }

    async fn fetch_environments(&self, application: &str) -> Result<Vec<EnvironmentRecord>> {
        let mut environments = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .describe_environments()
                .application_name(application)
                .include_deleted(false)
                .max_records(constants::DESCRIBE_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| PlatformError::FetchEnvironments {
                    application: application.to_string(),
                    message: describe_sdk_error(&e),
                })?;

            for description in output.environments() {
                environments.push(environment_record(description)?);
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            "Fetched {} environment(s) of {}",
            environments.len(),
            application
        );

        Ok(environments)
    }

    async fn delete_version(
        &self,
        application: &str,
        label: &str,
        delete_source_bundle: bool,
    ) -> Result<()> {
        self.client
            .delete_application_version()
            .application_name(application)
            .version_label(label)
            .delete_source_bundle(delete_source_bundle)
            .send()
            .await
            .map_err(|e| PlatformError::DeleteVersion {
                label: label.to_string(),
                message: describe_sdk_error(&e),
            })?;

        Ok(())
    }
}

/// Flattens an SDK error into "Code: message (HTTP status)".
fn describe_sdk_error<E>(err: &SdkError<E>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let Some(service_err) = err.as_service_error() else {
        return DisplayErrorContext(err).to_string();
    };

    let code = service_err.code().unwrap_or("Unknown");
    let message = service_err.message().unwrap_or("no error message");

    match err.raw_response() {
        Some(raw) => format!("{code}: {message} (HTTP {})", raw.status().as_u16()),
        None => format!("{code}: {message}"),
    }
}

fn version_record(
    application: &str,
    description: &ApplicationVersionDescription,
) -> Result<VersionRecord> {
    let label = description.version_label().ok_or_else(|| {
        PlatformError::InvalidResponse(format!("version of {application} has no label"))
    })?;

    let created_at = description
        .date_created()
        .and_then(to_utc)
        .ok_or_else(|| {
            PlatformError::InvalidResponse(format!(
                "version {label} of {application} has no valid creation date"
            ))
        })?;

    let source_bundle = description.source_bundle().and_then(|location| {
        Some(SourceBundle {
            bucket: location.s3_bucket()?.to_string(),
            key: location.s3_key()?.to_string(),
        })
    });

    Ok(VersionRecord {
        application: description
            .application_name()
            .unwrap_or(application)
            .to_string(),
        label: label.to_string(),
        created_at,
        description: description.description().map(str::to_string),
        status: description.status().map(|s| s.as_str().to_string()),
        source_bundle,
    })
}

fn environment_record(description: &EnvironmentDescription) -> Result<EnvironmentRecord> {
    let name = description.environment_name().ok_or_else(|| {
        PlatformError::InvalidResponse("environment without a name".to_string())
    })?;

    Ok(EnvironmentRecord {
        name: name.to_string(),
        version_label: description
            .version_label()
            .filter(|label| !label.is_empty())
            .map(str::to_string),
        status: description.status().map(|s| s.as_str().to_string()),
    })
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
