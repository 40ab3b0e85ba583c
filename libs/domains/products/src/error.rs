use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Product ID mismatch: route {route_id}, payload {payload_id}")]
    IdMismatch { route_id: i32, payload_id: i32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Insufficient stock for product {id}: requested {requested}, available {available}")]
    InsufficientStock {
        id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::IdMismatch {
                route_id,
                payload_id,
            } => AppError::BadRequest(format!(
                "Product ID mismatch: route {}, payload {}",
                route_id, payload_id
            )),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::InsufficientStock {
                id,
                requested,
                available,
            } => AppError::BadRequest(format!(
                "Insufficient stock for product {}: {} requested, {} available",
                id, requested, available
            )),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!(error = %err, "Product store operation failed");
        ProductError::Database(err.to_string())
    }
}
