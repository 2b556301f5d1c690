use ebclean_config::{EbcleanConfig, constants};
use ebclean_platform::PlatformConfig;
use ebclean_retention::RetentionPolicy;
use std::path::{Path, PathBuf};

/// Flag (or `AWS_REGION`, folded in by clap), then config file, then the built-in default.
pub fn platform_config(
    region: Option<&str>,
    endpoint_url: Option<&str>,
    config: &EbcleanConfig,
) -> PlatformConfig {
    PlatformConfig {
        region: region
            .map(str::to_string)
            .or_else(|| config.defaults.region.clone())
            .unwrap_or_else(|| constants::DEFAULT_REGION.to_string()),
        endpoint_url: endpoint_url
            .map(str::to_string)
            .or_else(|| config.defaults.endpoint_url.clone()),
    }
}

/// An explicit `--duration 0` is kept as a zero-day window.
pub fn retention_policy(
    application: &str,
    duration: Option<u32>,
    delete_source_bundle: Option<bool>,
    config: &EbcleanConfig,
) -> RetentionPolicy {
    RetentionPolicy {
        retention_days: duration
            .or_else(|| config.duration_for(application))
            .unwrap_or(constants::DEFAULT_RETENTION_DAYS),
        delete_source_bundle: delete_source_bundle
            .or_else(|| config.delete_source_bundle_for(application))
            .unwrap_or(false),
    }
}

/// Explicit path, else `ebclean.toml` in the working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_CONFIG_FILE))
}
