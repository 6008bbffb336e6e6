use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use farelist_api::{app, worker, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farelist_api=debug,farelist_core=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farelist_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting farelist API on port {}", config.server.port);

    let store = farelist_store::connect(&config.store)
        .await
        .context("Failed to initialize result store")?;

    if let Some(ttl) = config.store.ttl() {
        let every = (ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(worker::start_purge_worker(store.clone(), every));
    }

    let app_state = AppState::new(store, &config.pagination);
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
