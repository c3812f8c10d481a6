use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planning_api::config;
use planning_api::index;
use planning_api::search::PlanSearch;
use planning_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planning_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    // Load master index / 加载主索引
    let index_path = app_config.get_master_index_path();
    let master_index = if app_config.index.fail_fast {
        index::load_master_index(&index_path)?
    } else {
        index::load_or_empty(&index_path)
    };

    let state = Arc::new(AppState::new(PlanSearch::new(master_index), app_config.clone()));
    let app = planning_api::api::router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Israeli Planning Repository API running at http://{}", bind_addr);
    tracing::info!("Health check: http://{}/health", bind_addr);
    if app_config.is_development() {
        tracing::warn!("Development mode: internal error details are exposed in responses");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
