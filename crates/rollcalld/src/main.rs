use std::time::Duration;

use anyhow::Result;
use rollcall_core::SystemClock;
use rollcall_store::Ledger;
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;
mod gateway;
mod ingest;

use config::Config;
use dbus_interface::RollcallService;
use gateway::HttpGateway;
use ingest::IngestFlow;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("rollcalld starting");

    let config = Config::from_env();
    let roster = config.load_roster()?;
    tracing::info!(
        members = roster.len(),
        roster_only = config.roster_only,
        "roster loaded"
    );

    let ledger = Ledger::open(&config.db_path).await?;

    let gateway = HttpGateway::new(
        config.gateway_url.clone(),
        Duration::from_secs(config.gateway_timeout_secs),
    )?;
    tracing::info!(
        url = %config.gateway_url,
        threshold = config.confidence_threshold,
        timeout_secs = config.gateway_timeout_secs,
        "recognition gateway configured"
    );

    let flow = IngestFlow::new(
        gateway,
        ledger.clone(),
        roster.clone(),
        SystemClock,
        config.confidence_threshold,
        config.roster_only,
    );
    let service = RollcallService::new(flow, ledger, roster);

    let _conn = zbus::connection::Builder::session()?
        .name("org.freedesktop.Rollcall1")?
        .serve_at("/org/freedesktop/Rollcall1", service)?
        .build()
        .await?;

    tracing::info!("rollcalld ready");

    // Keep running until signaled
    tokio::signal::ctrl_c().await?;
    tracing::info!("rollcalld shutting down");

    Ok(())
}
