use utoipa::OpenApi;

/// Top-level API documentation, composed from the domain docs
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "API for managing an inventory of products with atomic stock adjustment"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    )
)]
pub struct ApiDoc;
