//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        decrement_stock,
        add_to_stock,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/decrement-stock/{id}/{quantity}", put(decrement_stock))
        .route("/add-to-stock/{id}/{quantity}", put(add_to_stock))
        .with_state(shared_service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "List of products in insertion order", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
///
/// Returns the id assigned by the store.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created; body is the new id", body = i32),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product.id)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product
///
/// The id embedded in the payload must match the path id.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product replaced"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<impl IntoResponse> {
    service.update_product(id, input).await?;
    Ok(StatusCode::OK)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted; body is true", body = bool),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
) -> ProductResult<Json<bool>> {
    let deleted = service.delete_product(id).await?;
    Ok(Json(deleted))
}

/// Remove quantity units from a product's stock
#[utoipa::path(
    put,
    path = "/decrement-stock/{id}/{quantity}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to remove; must be positive")
    ),
    responses(
        (status = 200, description = "Stock decremented; body is the new stock", body = i32),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn decrement_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path((id, quantity)): Path<(i32, i32)>,
) -> ProductResult<Json<i32>> {
    let stock = service.decrement_stock(id, quantity).await?;
    Ok(Json(stock))
}

/// Add quantity units to a product's stock
#[utoipa::path(
    put,
    path = "/add-to-stock/{id}/{quantity}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to add; must be positive")
    ),
    responses(
        (status = 200, description = "Stock incremented; body is the new stock", body = i32),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_to_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path((id, quantity)): Path<(i32, i32)>,
) -> ProductResult<Json<i32>> {
    let stock = service.increment_stock(id, quantity).await?;
    Ok(Json(stock))
}
