mod beanstalk;
mod error;
mod provider;

pub use beanstalk::{BeanstalkPlatform, PlatformConfig};
pub use error::{PlatformError, Result};
pub use provider::{EnvironmentRecord, Platform, SourceBundle, VersionRecord};
