// --- Schedule Sculptor - Archivo principal ---

use anyhow::Context;
use sculptor::config::AppConfig;
use sculptor::run_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    tracing::info!("=== Schedule Sculptor (API) ===");
    tracing::info!("Iniciando servidor en http://{}", config.bind);
    run_server(config).await.context("server stopped with an error")?;
    Ok(())
}
