//! marketplace - builds the Lemonade Marketplace catalog
//!
//! `marketplace build` turns `apps/*/app.json` into `apps.json`,
//! `marketplace validate` runs the same checks without writing, and
//! `marketplace logos` normalizes partner artwork into per-app logos.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use marketplace_core::catalog::{build_catalog, check_catalog, BuildSummary};
use marketplace_core::logos::LogoNormalizer;
use marketplace_core::{BuildError, ClassificationMode, MarketplaceConfig};

mod console;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Classification rule for the deployment
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Classification {
    /// Pinned flag from pinned.json, apps carry date_added
    Pinned,
    /// Featured flag from rank, apps carry rank
    Rank,
}

impl From<Classification> for ClassificationMode {
    fn from(value: Classification) -> Self {
        match value {
            Classification::Pinned => ClassificationMode::Pinned,
            Classification::Rank => ClassificationMode::Rank,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "marketplace",
    about = "Build the Lemonade Marketplace app catalog",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Marketplace root (contains apps/ and pinned.json)
    #[clap(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (defaults to <root>/marketplace.yaml when present)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "info", global = true)]
    log_level: LogLevel,
}

#[derive(Parser, Debug)]
enum Command {
    /// Validate every app.json and write apps.json
    Build {
        /// Output path, relative to the root (overrides config)
        #[clap(long, short)]
        output: Option<PathBuf>,

        /// Classification rule (overrides config)
        #[clap(long, value_enum)]
        classification: Option<Classification>,
    },

    /// Validate every app.json without writing anything
    Validate {
        /// Classification rule (overrides config)
        #[clap(long, value_enum)]
        classification: Option<Classification>,
    },

    /// Resize mapped source images into apps/<id>/logo.png
    Logos {
        /// Directory the configured logo sources are relative to
        #[clap(long)]
        assets_root: Option<PathBuf>,
    },
}

/// Initialize tracing with the tagged console format on stdout
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    tracing_subscriber::fmt()
        .event_format(console::TaggedFormat)
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let config = load_config(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Command::Build {
            output,
            classification,
        } => build_command(&cli.root, apply_overrides(config, classification), output),
        Command::Validate { classification } => {
            validate_command(&cli.root, apply_overrides(config, classification))
        }
        Command::Logos { assets_root } => logos_command(&cli.root, &config, assets_root),
    }
}

fn load_config(root: &Path, path: Option<&Path>) -> Result<MarketplaceConfig> {
    match path {
        Some(path) => MarketplaceConfig::load_from_path(path),
        None => MarketplaceConfig::load(root),
    }
    .context("Failed to load marketplace configuration")
}

fn apply_overrides(
    config: MarketplaceConfig,
    classification: Option<Classification>,
) -> MarketplaceConfig {
    match classification {
        Some(mode) => config.with_classification(mode.into()),
        None => config,
    }
}

fn build_command(root: &Path, mut config: MarketplaceConfig, output: Option<PathBuf>) -> Result<()> {
    if let Some(output) = output {
        config.output = output;
    }

    match build_catalog(root, &config) {
        Ok(summary) => {
            report_success(&summary);
            Ok(())
        }
        Err(err) => exit_on_build_error(err),
    }
}

fn report_success(summary: &BuildSummary) {
    info!(
        tag = "OK",
        "Successfully generated {}\n   - {} apps\n   - {} {}",
        summary.output.display(),
        summary.app_count,
        summary.flagged_count,
        summary.mode.flag_field()
    );
}

fn validate_command(root: &Path, config: MarketplaceConfig) -> Result<()> {
    match check_catalog(root, &config) {
        Ok(document) => {
            info!(
                tag = "OK",
                "All {} apps are valid ({} {})",
                document.apps.len(),
                document.flagged_count(),
                config.classification.flag_field()
            );
            Ok(())
        }
        Err(err) => exit_on_build_error(err),
    }
}

/// Validation failures and a missing apps directory end the process with
/// status 1 after logging; anything else propagates
fn exit_on_build_error(err: BuildError) -> Result<()> {
    match err {
        BuildError::Validation { .. } | BuildError::AppsDirNotFound { .. } => {
            error!("{err}");
            std::process::exit(1);
        }
        other => Err(other).context("Catalog build failed"),
    }
}

fn logos_command(
    root: &Path,
    config: &MarketplaceConfig,
    assets_root: Option<PathBuf>,
) -> Result<()> {
    let assets_root = assets_root.unwrap_or_else(|| root.join("..").join("assets"));
    let apps_dir = root.join(&config.apps_dir);

    info!(
        tag = "BUILD",
        "Normalizing {} logos from {} into {}",
        config.logos.sources.len(),
        assets_root.display(),
        apps_dir.display()
    );

    let report = LogoNormalizer::new(&assets_root, &apps_dir, config.logos.clone()).run();

    if report.failed() > 0 {
        info!("{} logo(s) failed, see errors above", report.failed());
    }

    Ok(())
}
