use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct EbcleanConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub applications: HashMap<String, ApplicationConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    pub region: Option<String>,

    pub endpoint_url: Option<String>,

    /// Retention window in days.
    pub duration: Option<u32>,

    pub delete_source_bundle: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ApplicationConfig {
    pub duration: Option<u32>,

    pub delete_source_bundle: Option<bool>,
}

impl EbcleanConfig {
    /// Retention window configured for `application`, falling back to `[defaults]`.
    pub fn duration_for(&self, application: &str) -> Option<u32> {
        self.applications
            .get(application)
            .and_then(|app| app.duration)
            .or(self.defaults.duration)
    }

    pub fn delete_source_bundle_for(&self, application: &str) -> Option<bool> {
        self.applications
            .get(application)
            .and_then(|app| app.delete_source_bundle)
            .or(self.defaults.delete_source_bundle)
    }
}

/// Reads an `ebclean.toml` file. A missing file yields the empty configuration.
pub async fn load_config(path: &Path) -> Result<EbcleanConfig> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {:?}, using built-in defaults", path);
            return Ok(EbcleanConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: EbcleanConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded config from {:?} ({} application override(s))",
        path,
        config.applications.len()
    );

    Ok(config)
}
