//! Host binary for the impact dashboard.
//!
//! Wires the dashboard core to a process: loads configuration, starts the
//! dashboard service, renders a frame for every cursor move, and routes
//! view-switch requests to the application shell.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `impact-config.yaml` (or `IMPACT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Select the data source (built-in records or a JSON file)
//! 4. Spawn the dashboard service
//! 5. Load data and render the first frame
//! 6. Render frames until Ctrl-C or `host.max_frames`
//! 7. Dispose the dashboard

mod error;
mod host;
mod shell;

use std::path::PathBuf;

use impact_core::config::{DashboardConfig, LogFormat, LoggingConfig};
use impact_core::dashboard::Dashboard;
use impact_core::loader::{ImpactLoader, RetryPolicy};
use impact_core::service::spawn_dashboard;
use impact_core::source::{ImpactSource, JsonFileSource, MockImpactSource};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Environment variable naming the config file.
const ENV_CONFIG_PATH: &str = "IMPACT_CONFIG";

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "impact-config.yaml";

/// Application entry point for the dashboard host.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the dashboard service
/// fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config_path = std::env::var(ENV_CONFIG_PATH)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = DashboardConfig::from_file_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config = %config_path.display(),
        max_attempts = config.loader.max_attempts,
        interval_ms = config.automation.interval_ms,
        max_frames = config.host.max_frames,
        "impact-dashboard starting"
    );

    // 3. Select the data source.
    let source: Box<dyn ImpactSource> = match &config.loader.data_file {
        Some(path) => {
            info!(path = %path.display(), "reading impact data from file");
            Box::new(JsonFileSource::new(path))
        }
        None => Box::new(MockImpactSource::new()),
    };

    // 4. Spawn the dashboard service.
    let dashboard = Dashboard::from_config(&config);
    let loader = ImpactLoader::new(source, RetryPolicy::from(&config.loader));
    let (handle, task) = spawn_dashboard(dashboard, loader);

    // 5-6. Load, then render until done.
    let shell = host::run(&handle, &config.host, shutdown_signal()).await?;
    info!(
        frames = shell.frames(),
        view = %shell.current_view(),
        "render loop finished"
    );

    // 7. Dispose.
    handle.dispose().await?;
    task.await?;
    info!("impact-dashboard shutdown complete");
    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| AppError::Logging {
        message: format!("{e}"),
    })
}
