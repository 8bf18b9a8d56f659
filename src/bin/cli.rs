//! Anjun Tracker CLI
//!
//! Resident polling entry point plus one-shot setup helpers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anjun_tracker::{
    error::AppError,
    models::{Config, LocaleConfig, TrackingView},
    pipeline,
    platform::{FileStatePublisher, LogPublisher, StatePublisher},
    services::TrackingApiClient,
};
use clap::{Parser, Subcommand};

/// Exit code when the provider does not know the tracking number.
const EXIT_TRACKING_NOT_FOUND: u8 = 2;
/// Exit code for timeouts and transport failures.
const EXIT_CONNECTION: u8 = 3;

/// Anjun Tracker - Package Tracking Poller
#[derive(Parser, Debug)]
#[command(name = "anjun-tracker", version, about = "Anjun Express package tracker")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the locale file with user-facing messages
    #[arg(long, default_value = "locale.toml")]
    locale: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll all configured packages until the process is stopped
    Run {
        /// Publish to the log only, leaving the state directory untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Look up a tracking number once, as a pre-flight check
    Check {
        /// Tracking number to look up
        tracking_number: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let locale = LocaleConfig::load_or_default(&cli.locale);

    match cli.command {
        Command::Run { dry_run } => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return ExitCode::FAILURE;
            }

            log::info!("{}", locale.messages.run_starting);
            log::info!(
                "{}",
                locale
                    .messages
                    .packages_loaded
                    .replace("{count}", &config.packages.len().to_string())
            );

            let publisher: Arc<dyn StatePublisher> = if dry_run {
                log::info!("Dry run: publishing to the log only");
                Arc::new(LogPublisher)
            } else {
                log::info!("Publishing state to {}", config.state.dir.display());
                Arc::new(FileStatePublisher::new(&config.state.dir))
            };

            match pipeline::run_tracker(&config, publisher).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("Tracker stopped: {}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Command::Check { tracking_number } => {
            log::info!("Checking tracking number {}...", tracking_number);

            let client = match TrackingApiClient::new(&config.api, tracking_number.clone()) {
                Ok(client) => client,
                Err(e) => {
                    log::error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            match client.fetch_tracking().await {
                Ok(snapshot) => {
                    let view = TrackingView::from_snapshot(&snapshot);
                    log::info!(
                        "{}",
                        locale
                            .messages
                            .check_passed
                            .replace("{tracking}", &tracking_number)
                    );
                    log::info!(
                        "    Status: {}",
                        view.current_status.as_deref().unwrap_or("unknown")
                    );
                    log::info!(
                        "    Location: {}",
                        view.current_location.as_deref().unwrap_or("unknown")
                    );
                    log::info!("    Events: {}", view.event_count);
                    log::info!("    Delivered: {}", view.delivered);
                    ExitCode::SUCCESS
                }
                Err(AppError::TrackingNotFound) => {
                    log::error!("{}", locale.errors.tracking_not_found);
                    ExitCode::from(EXIT_TRACKING_NOT_FOUND)
                }
                Err(AppError::Communication(e)) => {
                    log::error!("{} ({})", locale.errors.connection, e);
                    ExitCode::from(EXIT_CONNECTION)
                }
                Err(e) => {
                    log::error!("{} ({})", locale.errors.unknown, e);
                    ExitCode::FAILURE
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            let config = match Config::load(&cli.config) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Config load failed: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return ExitCode::FAILURE;
            }

            log::info!("{}", locale.messages.validate_ok);
            log::info!("    API base: {}", config.api.base_url);
            log::info!(
                "    Refresh interval: {} minute(s)",
                config.refresh.interval_minutes
            );
            log::info!("    State directory: {}", config.state.dir.display());
            log::info!("    Packages: {}", config.packages.len());
            for package in &config.packages {
                log::info!("      {} ({})", package.name, package.tracking_number);
            }
            ExitCode::SUCCESS
        }
    }
}
