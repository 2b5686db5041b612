//! Readiness endpoint

use axum::{response::IntoResponse, routing::get, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};

use crate::state::AppState;

async fn ready(state: AppState) -> impl IntoResponse {
    let service = state.service.clone();
    let search_index: HealthCheckFuture =
        Box::pin(async move { service.check_index().await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("search_index", search_index)]).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(move || ready(state)))
}
