//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed body or query string",
    content_type = "application/json",
    example = json!({
        "code": 1003,
        "error": "JSON_EXTRACTION",
        "message": "Failed to deserialize the JSON body into the target type"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - embedding provider or search index failed",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "UPSTREAM_ERROR",
        "message": "Search index error: 403 Forbidden"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable - upstream throttling or outage",
    content_type = "application/json",
    example = json!({
        "code": 2002,
        "error": "UPSTREAM_UNAVAILABLE",
        "message": "Embedding provider error (429 Too Many Requests): quota exceeded"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
