use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// This trait defines the data access interface for products.
/// Implementations can use different storage backends (PostgreSQL, in-memory).
///
/// Stock adjustments are read-then-write against the current row; the shipped
/// implementations do not serialize concurrent adjustments on the same id.
/// An implementation that needs per-id serialization (row locks, optimistic
/// versioning) can provide it behind this same interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product; the store assigns the id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// List all products in id (insertion) order
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Replace an existing product's mutable fields
    async fn update(&self, id: i32, replacement: UpdateProduct) -> ProductResult<()>;

    /// Delete a product by ID; returns false when absent
    async fn delete(&self, id: i32) -> ProductResult<bool>;

    /// Subtract quantity from stock and return the new value
    ///
    /// Fails with `InsufficientStock` (stock unchanged) when the current
    /// stock is below the requested quantity.
    async fn decrement_stock(&self, id: i32, quantity: i32) -> ProductResult<i32>;

    /// Add quantity to stock and return the new value (no upper bound)
    async fn increment_stock(&self, id: i32, quantity: i32) -> ProductResult<i32>;
}

#[derive(Debug, Default)]
struct InMemoryStore {
    next_id: i32,
    products: BTreeMap<i32, Product>,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<InMemoryStore>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        store.next_id += 1;
        let product = Product::new(store.next_id, input);
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        // BTreeMap iterates in key order, which is insertion order for
        // monotonically assigned ids
        Ok(store.products.values().cloned().collect())
    }

    async fn update(&self, id: i32, replacement: UpdateProduct) -> ProductResult<()> {
        let mut store = self.store.write().await;

        let product = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;
        product.apply_replacement(replacement);

        tracing::info!(product_id = id, "Updated product");
        Ok(())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn decrement_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        let mut store = self.store.write().await;

        let product = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;

        if product.stock < quantity {
            tracing::warn!(
                product_id = id,
                requested = quantity,
                available = product.stock,
                "Insufficient stock"
            );
            return Err(ProductError::InsufficientStock {
                id,
                requested: quantity,
                available: product.stock,
            });
        }

        product.stock -= quantity;
        tracing::info!(product_id = id, stock = product.stock, "Decremented stock");
        Ok(product.stock)
    }

    async fn increment_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        let mut store = self.store.write().await;

        let product = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;

        product.stock += quantity;
        tracing::info!(product_id = id, stock = product.stock, "Incremented stock");
        Ok(product.stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(name: &str, price: i64, stock: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: None,
            price,
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(widget("A", 100, 1)).await.unwrap();
        let second = repo.create(widget("B", 200, 2)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let repo = InMemoryProductRepository::new();

        let created = repo.create(widget("Widget", 100, 5)).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap();
        let fetched = fetched.expect("product should exist");
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, 100);
        assert_eq!(fetched.stock, 5);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_empty_is_empty_vec() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_insertion_order() {
        let repo = InMemoryProductRepository::new();
        repo.create(widget("A", 1, 1)).await.unwrap();
        repo.create(widget("B", 2, 2)).await.unwrap();
        repo.create(widget("C", 3, 3)).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Old", 1, 1)).await.unwrap();

        repo.update(
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

        let updated = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description.as_deref(), Some("Desc"));
        assert_eq!(updated.price, 2);
        assert_eq!(updated.stock, 3);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();

        let result = repo
            .update(
                42,
                UpdateProduct {
                    id: 42,
                    name: "X".to_string(),
                    description: None,
                    price: 1,
                    stock: 1,
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Widget", 1, 1)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        // Second delete finds nothing
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_decrement_stock() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Widget", 10, 5)).await.unwrap();

        let remaining = repo.decrement_stock(created.id, 2).await.unwrap();
        assert_eq!(remaining, 3);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 3);
    }

    #[tokio::test]
    async fn test_decrement_below_zero_fails_and_preserves_stock() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Widget", 10, 1)).await.unwrap();

        let result = repo.decrement_stock(created.id, 2).await;
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

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 1);
    }

    #[tokio::test]
    async fn test_decrement_to_exactly_zero() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Widget", 10, 2)).await.unwrap();

        let remaining = repo.decrement_stock(created.id, 2).await.unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_increment_stock() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(widget("Widget", 10, 5)).await.unwrap();

        let total = repo.increment_stock(created.id, 7).await.unwrap();
        assert_eq!(total, 12);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 12);
    }

    #[tokio::test]
    async fn test_stock_ops_on_missing_product() {
        let repo = InMemoryProductRepository::new();

        assert!(matches!(
            repo.decrement_stock(1, 1).await,
            Err(ProductError::NotFound(1))
        ));
        assert!(matches!(
            repo.increment_stock(1, 1).await,
            Err(ProductError::NotFound(1))
        ));
    }
}
