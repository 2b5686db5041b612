//! HTTP handlers for the Search AI API

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::post,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadGatewayResponse, BadRequestResponse, InternalServerErrorResponse,
        ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SearchAIError;
use crate::models::{
    BaseReturn, InboundProduct, OutboundProduct, SimilarityParams, SimilarityRequest,
    SimilarityResult,
};
use crate::service::SearchAIService;

/// OpenAPI documentation for the Search AI API
#[derive(OpenApi)]
#[openapi(
    paths(add_product_to_index, search_by_vector_similarity),
    components(
        schemas(
            InboundProduct, OutboundProduct, SimilarityResult, SimilarityRequest, BaseReturn
        ),
        responses(
            BadRequestResponse,
            BadGatewayResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "SearchAI", description = "Product vector indexing and similarity search")
    )
)]
pub struct ApiDoc;

/// Create the Search AI router
pub fn router(service: SearchAIService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/AddProductToAzureSearchIndex", post(add_product_to_index))
        .route("/SearchByVectorSimilarity", post(search_by_vector_similarity))
        .with_state(shared_service)
}

/// Embed a product and upsert it into the vector index
///
/// Indexing outcomes, including upstream failures, are reported in the
/// response body with status 200.
#[utoipa::path(
    post,
    path = "/AddProductToAzureSearchIndex",
    tag = "SearchAI",
    request_body = InboundProduct,
    responses(
        (status = 200, description = "Indexing outcome", body = BaseReturn),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn add_product_to_index(
    State(service): State<Arc<SearchAIService>>,
    payload: Result<Json<InboundProduct>, JsonRejection>,
) -> Result<Json<BaseReturn>, AppError> {
    let Json(product) = payload?;
    Ok(Json(service.add_product_to_index(&product).await))
}

/// Find the products closest to a free-text query
///
/// The text is read from the `query` parameter (alias `textoConsulta`) or,
/// when absent, from a JSON body `{"query": "..."}`.
#[utoipa::path(
    post,
    path = "/SearchByVectorSimilarity",
    tag = "SearchAI",
    params(SimilarityParams),
    request_body(content = Option<SimilarityRequest>, description = "Alternative to the query parameter"),
    responses(
        (status = 200, description = "Ranked matches, closest first", body = Vec<SimilarityResult>),
        (status = 400, response = BadRequestResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_vector_similarity(
    State(service): State<Arc<SearchAIService>>,
    params: Result<Query<SimilarityParams>, QueryRejection>,
    body: Result<Option<Json<SimilarityRequest>>, JsonRejection>,
) -> Result<Json<Vec<SimilarityResult>>, AppError> {
    let Query(params) = params?;

    // The body is only read when the query parameter is absent.
    let query = match params.query {
        Some(query) => query,
        None => body?.map(|Json(request)| request.query).ok_or_else(|| {
            SearchAIError::Validation(
                "query text is required (query parameter or JSON body)".to_string(),
            )
        })?,
    };

    let results = service.search_by_vector_similarity(&query).await?;
    Ok(Json(results))
}
