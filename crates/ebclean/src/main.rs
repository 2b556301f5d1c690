mod cli;
mod settings;

use clap::Parser;
use cli::{CleanArgs, Cli, Command, InspectArgs, OutputFormat};
use ebclean_config::constants;
use ebclean_platform::{BeanstalkPlatform, PlatformError};
use ebclean_retention::{RetentionManager, report};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when `clean` ran but at least one deletion failed.
const PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = settings::config_path(cli.config.as_deref());
    if cli.config.is_some() && !tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
        anyhow::bail!("config file {:?} does not exist", config_path);
    }
    let config = ebclean_config::load_config(&config_path).await?;

    let platform_config =
        settings::platform_config(cli.region.as_deref(), cli.endpoint_url.as_deref(), &config);
    tracing::debug!(
        "Using region {} (endpoint: {:?})",
        platform_config.region,
        platform_config.endpoint_url
    );

    let platform = Arc::new(BeanstalkPlatform::new(&platform_config).await);
    let manager = RetentionManager::new(platform);

    match cli.command {
        Command::Inspect(args) => inspect(&manager, &args, &config, cli.format).await,
        Command::Clean(args) => clean(&manager, &args, &config, cli.format).await,
    }
}

/// Wraps a platform error with what was being attempted. Listing failures
/// abort the run before any deletion, which the message makes explicit.
fn platform_failure(action: &str, application: &str, err: PlatformError) -> anyhow::Error {
    let context = if err.is_fetch() {
        format!(
            "failed to {action} application {application}: could not list its versions \
             or environments, nothing was deleted"
        )
    } else {
        format!("failed to {action} application {application}")
    };

    anyhow::Error::new(err).context(context)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    let json = std::env::var(constants::LOG_FORMAT_ENV_VAR)
        .map(|v| v == "json")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn inspect(
    manager: &RetentionManager,
    args: &InspectArgs,
    config: &ebclean_config::EbcleanConfig,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let policy = settings::retention_policy(&args.application, args.duration, None, config);

    let result = manager
        .inspect(&args.application, &policy, chrono::Utc::now())
        .await
        .map_err(|e| platform_failure("inspect", &args.application, e))?;

    match format {
        OutputFormat::Table => {
            println!("{}", report::render_inspection(&args.application, &result));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(ExitCode::SUCCESS)
}

async fn clean(
    manager: &RetentionManager,
    args: &CleanArgs,
    config: &ebclean_config::EbcleanConfig,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let policy = settings::retention_policy(
        &args.application,
        args.duration,
        args.source_bundle_flag(),
        config,
    );

    let clean_report = manager
        .clean(&args.application, &policy, chrono::Utc::now())
        .await
        .map_err(|e| platform_failure("clean", &args.application, e))?;

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                report::render_inspection(&args.application, &clean_report.classification)
            );
            if clean_report.outcomes.is_empty() {
                println!("No version can be deleted");
            } else {
                print!("{}", report::render_outcomes(&clean_report.outcomes));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&clean_report)?),
    }

    let summary = clean_report.summary();
    if summary.has_failures() {
        eprintln!(
            "{} of {} version(s) could not be deleted",
            summary.failed,
            summary.failed + summary.deleted
        );
        return Ok(ExitCode::from(PARTIAL_FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}
