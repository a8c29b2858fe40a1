use anyhow::Context;
use tpad::domain::config::AppConfig;
use tpad::kernel::config::load_config;
use tpad_logger::Logger;
use tpad_registry::ServiceRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    let config: AppConfig =
        load_config(Some("studio")).context("Critical: Configuration is malformed")?;

    let registry = ServiceRegistry::new();
    tpad::init(&config, &registry).await.map_err(|e| anyhow::anyhow!(e))?;

    registry.log_features();
    tracing::info!(roles = ?registry.roles(), "TinkerPad core ready");

    // The editor shell takes over from here; keep the process alive until
    // interrupted so registered services stay resolvable.
    tokio::signal::ctrl_c().await.context("Waiting for shutdown signal")?;
    registry.show_info("Shutting down");
    Ok(())
}
