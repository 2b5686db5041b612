//! Search AI gateway - REST front for product vector indexing and search

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_search_ai::{AzureOpenAIProvider, AzureSearchIndex, SearchAIService};
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        "Using search index '{}' at {}",
        config.search.index_name, config.search.endpoint
    );

    let embeddings = AzureOpenAIProvider::new(config.openai.clone(), config.retry.clone())?;
    let index = AzureSearchIndex::new(config.search.clone(), config.retry.clone())?;

    if config.search.create_index {
        let created = index.ensure_index(config.policy.embedding_dimensions).await?;
        info!(created, "Search index provisioned");
    }

    let service = SearchAIService::new(
        Arc::new(embeddings),
        Arc::new(index),
        config.policy.clone(),
    )?;

    let state = AppState {
        config: config.clone(),
        service,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, server.shutdown_timeout, async move {
        info!("Shutting down: releasing upstream clients");
        drop(state);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Search AI gateway shutdown complete");
    Ok(())
}
