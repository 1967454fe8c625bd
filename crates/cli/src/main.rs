//! # dns-noise
//!
//! Issues DNS lookups for random popular domains so that real lookups from
//! the same network are harder to pick out of a query log.

mod bootstrap;
mod server;

use bootstrap::{init_database, init_logging, load_config, NoiseServices};
use clap::Parser;
use dns_noise_domain::CliOverrides;
use dns_noise_jobs::JobRunner;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dns-noise")]
#[command(version)]
#[command(about = "Generates DNS noise to mask real DNS traffic")]
struct Cli {
    /// Configuration file (default: ./dns-noise.toml when present)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// SQLite database holding the domain corpus
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Minimum period between noise queries, in milliseconds
    #[arg(long)]
    min: Option<u64>,

    /// Maximum period between noise queries, in milliseconds
    #[arg(long)]
    max: Option<u64>,

    /// Use the existing database without reloading the sources
    #[arg(short = 'r', long)]
    reuse_db: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        database_path: cli.database.clone(),
        min_period_ms: cli.min,
        max_period_ms: cli.max,
    };

    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config);
    bootstrap::config::log_config_summary(cli.config.as_deref(), &config);

    let pool = init_database(&config.database.url()).await?;
    let services = NoiseServices::new(&config, pool)?;
    services.prepare_corpus(cli.reuse_db).await?;

    let shutdown = CancellationToken::new();

    let metrics_task = if config.metrics.enabled {
        let metrics_config = config.metrics.clone();
        let metrics = services.metrics.clone();
        let token = shutdown.child_token();
        Some(tokio::spawn(async move {
            if let Err(e) = server::serve_metrics(&metrics_config, metrics, token).await {
                error!(error = %e, "Metrics listener failed");
            }
        }))
    } else {
        None
    };

    let running = JobRunner::new()
        .with_cancellation(shutdown.clone())
        .with_noise_loop(services.into_noise_loop())
        .start();

    info!("dns-noise running, press Ctrl+C to stop");
    shutdown_signal().await?;
    info!("Shutdown requested");

    if let Some(summary) = running.shutdown().await {
        info!(
            ticks = summary.ticks,
            queries = summary.queries,
            "Noise loop stopped"
        );
    }

    if let Some(task) = metrics_task {
        let _ = task.await;
    }

    Ok(())
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
