mod config;
pub mod constants;

pub use config::{
    ApplicationConfig, ConfigError, DefaultsConfig, EbcleanConfig, Result, load_config,
};
