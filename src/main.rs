use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use lb_controller::config::{
    apply_poll_interval_env, load_settings, validate_settings, ConfigError, Settings,
};
use lb_controller::lifecycle::Shutdown;
use lb_controller::metadata::MetadataClient;
use lb_controller::reconciler::Reconciler;
use lb_controller::registry::RegistryClient;
use lb_controller::{health, observability, provider};

#[derive(Parser)]
#[command(name = "lb-controller")]
#[command(about = "External load balancer reconciliation controller", long_about = None)]
struct Cli {
    /// External load balancer provider name.
    #[arg(long)]
    provider: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Log file path (defaults to stderr).
    #[arg(long)]
    log: Option<PathBuf>,

    /// Optional TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    // CLI flags win over the settings file.
    if let Some(name) = cli.provider {
        settings.provider.name = name;
    }
    if cli.debug {
        settings.observability.debug = true;
    }
    if let Some(path) = cli.log {
        settings.observability.log_file = Some(path);
    }

    apply_poll_interval_env(&mut settings)?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;

    observability::logging::init(
        settings.observability.debug,
        settings.observability.log_file.as_deref(),
    )?;

    tracing::info!("lb-controller v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        provider = %settings.provider.name,
        poll_interval_ms = settings.timing.poll_interval_ms,
        force_update_interval_secs = settings.timing.force_update_interval_secs,
        "Configuration loaded"
    );

    if settings.observability.metrics_enabled {
        if let Ok(addr) = settings.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Collaborator construction failures are fatal: a controller that cannot
    // reach its source, registry, or provider has nothing to do.
    let source = MetadataClient::from_env()?;
    let registry = RegistryClient::from_env()?;
    let provider = provider::create(&settings.provider.name)?;

    let shutdown = Shutdown::new();
    shutdown.spawn_signal_handler();

    // Liveness runs independently of the loop and must never block on it.
    let health_listener = TcpListener::bind(&settings.health.bind_address).await?;
    tracing::info!(
        address = %settings.health.bind_address,
        "Liveness endpoint listening"
    );
    let health_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_listener, health_shutdown).await {
            tracing::error!(error = %e, "Liveness endpoint failed");
        }
    });

    let reconciler = Reconciler::new(
        Box::new(source),
        provider,
        Box::new(registry),
        std::time::Duration::from_millis(settings.timing.poll_interval_ms),
        std::time::Duration::from_secs(settings.timing.force_update_interval_secs),
    );

    reconciler.run(shutdown.subscribe()).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
