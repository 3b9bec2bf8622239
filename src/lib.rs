pub mod dashboard;
pub mod data;
pub mod display;
pub mod ephemeral;
pub mod events;
pub mod insights;
pub mod settings;
pub mod tasks;
pub mod utils;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use log::{info, warn};
use tokio::sync::broadcast::error::RecvError;

pub use dashboard::{Dashboard, DashboardConfig, DashboardDeps, DashboardView};
pub use events::{BroadcastBus, DashboardEvent, EventBus, NullBus, RecordingBus, SharedBus};

const EVENT_BUS_CAPACITY: usize = 256;
const DEMO_TRANSMISSION_EVERY_SECS: u64 = 7;

/// Headless demo: boots a dashboard, logs every bus event and runs until
/// Ctrl-C.
pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Agency dashboard starting up...");

    let runtime = tokio::runtime::Runtime::new().context("failed to build tokio runtime")?;
    runtime.block_on(run_session())
}

async fn run_session() -> anyhow::Result<()> {
    let bus = BroadcastBus::new(EVENT_BUS_CAPACITY);
    let mut events = bus.subscribe();
    let shared: SharedBus = Arc::new(bus);

    let dashboard = Dashboard::from_config(DashboardConfig::from_env(), shared)?;
    dashboard.start().await?;

    let counts = dashboard.tasks().derive_counts();
    info!(
        "{} tasks loaded ({} in progress, {} due today)",
        counts.total, counts.in_progress, counts.due_today
    );
    dashboard
        .notify(
            ephemeral::NotificationKind::Info,
            "Welcome back, all agents are online",
            true,
        )
        .await;

    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => info!("event {json}"),
                    Err(err) => warn!("unserializable event {event:?}: {err}"),
                },
                Err(RecvError::Lagged(skipped)) => warn!("event log skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut transmissions = tokio::time::interval(Duration::from_secs(DEMO_TRANSMISSION_EVERY_SECS));
    loop {
        tokio::select! {
            _ = transmissions.tick() => {
                dashboard
                    .transmit(
                        ephemeral::Point { x: 120.0, y: 80.0 },
                        ephemeral::Point { x: 420.0, y: 260.0 },
                        "#38bdf8",
                    )
                    .await;
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!("failed to listen for Ctrl-C: {err}");
                }
                break;
            }
        }
    }

    dashboard.shutdown().await;
    logger.abort();
    Ok(())
}
