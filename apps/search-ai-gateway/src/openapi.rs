//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Search AI gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Search AI Gateway",
        version = "0.1.0",
        description = "Product vector indexing and similarity search over Azure AI Search",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/SearchAI", api = domain_search_ai::ApiDoc)
    ),
    tags(
        (name = "SearchAI", description = "Product vector indexing and similarity search")
    )
)]
pub struct ApiDoc;
