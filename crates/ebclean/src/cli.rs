use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Clean up old application versions in AWS Elastic Beanstalk
#[derive(Parser, Debug)]
#[command(name = "ebclean", version, about, long_about = None)]
pub struct Cli {
    /// AWS region (falls back to the config file, then us-east-1)
    #[arg(short, long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom Elastic Beanstalk endpoint, e.g. a localstack instance
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Path to the config file (defaults to ./ebclean.toml when present)
    #[arg(long, global = true, env = "EBCLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for reports
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect an application and list its disposable versions
    Inspect(InspectArgs),

    /// Delete every disposable version of an application
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Elastic Beanstalk application name
    pub application: String,

    /// Days after which an unused version is obsolete (0 disables the window, default 30)
    #[arg(short, long)]
    pub duration: Option<u32>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Elastic Beanstalk application name
    pub application: String,

    /// Days after which an unused version is obsolete (0 disables the window, default 30)
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Also delete the source bundle of each version from S3
    #[arg(long, conflicts_with = "keep_source_bundle")]
    pub delete_source_bundle: bool,

    /// Keep source bundles even if the config file says otherwise
    #[arg(long)]
    pub keep_source_bundle: bool,
}

impl CleanArgs {
    /// Source bundle choice given on the command line, if any.
    pub fn source_bundle_flag(&self) -> Option<bool> {
        match (self.delete_source_bundle, self.keep_source_bundle) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
