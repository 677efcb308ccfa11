use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use drivewatch::{
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{StorageConfig, read_config_file},
    engine::{StatusIngestEngine, spawn_daily_summary},
    notify::SmtpNotifier,
    storage::{MemoryStatusStore, SqliteStatusStore, StatusStore},
    throttle::AlertThrottle,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("drivewatch", LevelFilter::TRACE),
        ("drivewatch_server", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();

    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let store: Arc<dyn StatusStore> = match &config.storage {
        StorageConfig::Sqlite { path } => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Arc::new(SqliteStatusStore::new(path).await?)
        }
        StorageConfig::Memory => Arc::new(MemoryStatusStore::new()),
    };

    let notifier = Arc::new(SmtpNotifier::new(&config.smtp, &config.recipients)?);

    let throttle = AlertThrottle::from_millis(
        config.reminders.hard_interval_ms,
        config.reminders.soft_interval_ms,
    );
    let engine = Arc::new(StatusIngestEngine::new(
        store.clone(),
        notifier,
        config.thresholds,
        throttle,
    ));

    let summary_task = spawn_daily_summary(
        engine.clone(),
        Duration::from_secs(config.daily_report_interval_secs),
    );

    let state = ApiState::new(engine, store.clone(), config.thresholds);
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let addr = spawn_api_server(ApiConfig { bind_addr }, state).await?;
    info!("drivewatch hub listening on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    summary_task.abort();
    store.close().await?;

    Ok(())
}
