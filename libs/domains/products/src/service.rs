//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations. The repository handle is injected at construction;
/// there is no global store.
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product and return it with its store-assigned id
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        // Validate input (non-negative price and stock, non-empty name)
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// List all products in insertion order
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Replace an existing product
    ///
    /// The route id must match the id embedded in the replacement payload.
    #[instrument(skip(self, replacement), fields(product_id = %id))]
    pub async fn update_product(&self, id: i32, replacement: UpdateProduct) -> ProductResult<()> {
        if id != replacement.id {
            return Err(ProductError::IdMismatch {
                route_id: id,
                payload_id: replacement.id,
            });
        }

        replacement
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, replacement).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(true)
    }

    /// Remove quantity units from stock, returning the new stock value
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        if quantity <= 0 {
            return Err(ProductError::Validation(
                "Quantity must be greater than zero".to_string(),
            ));
        }

        self.repository.decrement_stock(id, quantity).await
    }

    /// Add quantity units to stock, returning the new stock value
    #[instrument(skip(self))]
    pub async fn increment_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        if quantity <= 0 {
            return Err(ProductError::Validation(
                "Quantity must be greater than zero".to_string(),
            ));
        }

        self.repository.increment_stock(id, quantity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};

    fn widget(name: &str, price: i64, stock: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: None,
            price,
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price_without_touching_store() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let service = ProductService::new(repo);
        let result = service.create_product(widget("Widget", -1, 0)).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_stock_without_touching_store() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let service = ProductService::new(repo);
        let result = service.create_product(widget("Widget", 0, -1)).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let created = service
            .create_product(CreateProduct {
                name: "Test".to_string(),
                description: Some("A test product".to_string()),
                price: 10,
                stock: 5,
            })
            .await
            .unwrap();

        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Test");
        assert_eq!(fetched.price, 10);
        assert_eq!(fetched.stock, 5);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let result = service.get_product(404).await;
        assert!(matches!(result, Err(ProductError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let service = ProductService::new(InMemoryProductRepository::new());
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_id_mismatch_without_touching_store() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().never();

        let service = ProductService::new(repo);
        let result = service
            .update_product(
                1,
                UpdateProduct {
                    id: 2,
                    name: "Widget".to_string(),
                    description: None,
                    price: 1,
                    stock: 1,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(ProductError::IdMismatch {
                route_id: 1,
                payload_id: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(widget("Old", 1, 1)).await.unwrap();

        service
            .update_product(
                created.id,
                UpdateProduct {
                    id: created.id,
                    name: "New".to_string(),
                    description: Some("Desc".to_string()),
                    price: 2,
                    stock: 3,
                },
            )
            .await
            .unwrap();

        let updated = service.get_product(created.id).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.price, 2);
        assert_eq!(updated.stock, 3);
    }

    #[tokio::test]
    async fn test_update_rejects_negative_replacement_values() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(widget("Widget", 1, 1)).await.unwrap();

        let result = service
            .update_product(
                created.id,
                UpdateProduct {
                    id: created.id,
                    name: "Widget".to_string(),
                    description: None,
                    price: -5,
                    stock: 1,
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
        // Original record untouched
        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.price, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let result = service
            .update_product(
                9,
                UpdateProduct {
                    id: 9,
                    name: "Ghost".to_string(),
                    description: None,
                    price: 1,
                    stock: 1,
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_delete_returns_true_then_not_found() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(widget("Widget", 1, 1)).await.unwrap();

        assert!(service.delete_product(created.id).await.unwrap());

        let result = service.delete_product(created.id).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_decrement_happy_path_scenario() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service
            .create_product(widget("Test", 10, 5))
            .await
            .unwrap();

        let remaining = service.decrement_stock(created.id, 2).await.unwrap();
        assert_eq!(remaining, 3);

        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.stock, 3);
    }

    #[tokio::test]
    async fn test_decrement_insufficient_stock_scenario() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(widget("Test", 10, 1)).await.unwrap();

        let result = service.decrement_stock(created.id, 2).await;
        match result {
            Err(ProductError::InsufficientStock {
                id,
                requested,
                available,
            }) => {
                assert_eq!(id, created.id);
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        // Stock unchanged
        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.stock, 1);
    }

    #[tokio::test]
    async fn test_stock_adjustments_reject_non_positive_quantity() {
        let mut repo = MockProductRepository::new();
        repo.expect_decrement_stock().never();
        repo.expect_increment_stock().never();

        let service = ProductService::new(repo);

        for quantity in [0, -1] {
            assert!(matches!(
                service.decrement_stock(1, quantity).await,
                Err(ProductError::Validation(_))
            ));
            assert!(matches!(
                service.increment_stock(1, quantity).await,
                Err(ProductError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_increment_stock() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(widget("Test", 10, 5)).await.unwrap();

        let total = service.increment_stock(created.id, 4).await.unwrap();
        assert_eq!(total, 9);
    }

    #[tokio::test]
    async fn test_stock_ops_on_missing_product() {
        let service = ProductService::new(InMemoryProductRepository::new());

        assert!(matches!(
            service.decrement_stock(5, 1).await,
            Err(ProductError::NotFound(5))
        ));
        assert!(matches!(
            service.increment_stock(5, 1).await,
            Err(ProductError::NotFound(5))
        ));
    }
}
