//! API routes module

pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(
        "/SearchAI",
        domain_search_ai::router(state.service.clone()),
    )
}
