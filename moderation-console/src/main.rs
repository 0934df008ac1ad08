use console_core::observability::{init_metrics, init_tracing};
use dotenvy::dotenv;
use moderation_console::config::get_configuration;
use moderation_console::query::QueryClient;
use moderation_console::services::{AdminClient, BackendHttp, ModeratorClient};
use moderation_console::startup::build_router;
use moderation_console::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "moderation-console",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    init_metrics().map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    let http = BackendHttp::new(&configuration.backend)
        .map_err(|e| anyhow::anyhow!("Invalid backend configuration: {}", e))?;
    let admin_client = Arc::new(AdminClient::new(http.clone()));
    let moderator_client = Arc::new(ModeratorClient::new(http));

    let queries = QueryClient::new();
    let _gc = queries.spawn_garbage_collector(Duration::from_secs(
        configuration.cache.gc_interval_secs,
    ));

    let state = AppState::new(admin_client, moderator_client, queries);
    let app = build_router(state, &configuration.server);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(
        backend = %configuration.backend.url,
        "Starting moderation-console on {}", address
    );
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
