pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

pub const REGION_ENV_VAR: &str = "AWS_REGION";
pub const CONFIG_ENV_VAR: &str = "EBCLEAN_CONFIG";
pub const LOG_FORMAT_ENV_VAR: &str = "EBCLEAN_LOG_FORMAT";

pub const DEFAULT_CONFIG_FILE: &str = "ebclean.toml";

/// Upper bound accepted by DescribeApplicationVersions and DescribeEnvironments.
pub const DESCRIBE_PAGE_SIZE: i32 = 1000;
