use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, UpdateProduct},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository backed by SeaORM
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<entity::Model>> {
        Ok(entity::Entity::find_by_id(id).one(&self.db).await?)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = self.find_by_id(id).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: i32, replacement: UpdateProduct) -> ProductResult<()> {
        let model = self.find_by_id(id).await?.ok_or(ProductError::NotFound(id))?;

        let mut active_model = model.into_active_model();
        active_model.name = Set(replacement.name);
        active_model.description = Set(replacement.description);
        active_model.price = Set(replacement.price);
        active_model.stock = Set(replacement.stock);

        active_model.update(&self.db).await?;

        tracing::info!(product_id = id, "Updated product");
        Ok(())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let Some(model) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        model.delete(&self.db).await?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(true)
    }

    async fn decrement_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        let model = self.find_by_id(id).await?.ok_or(ProductError::NotFound(id))?;

        if model.stock < quantity {
            tracing::warn!(
                product_id = id,
                requested = quantity,
                available = model.stock,
                "Insufficient stock"
            );
            return Err(ProductError::InsufficientStock {
                id,
                requested: quantity,
                available: model.stock,
            });
        }

        let new_stock = model.stock - quantity;
        let mut active_model = model.into_active_model();
        active_model.stock = Set(new_stock);
        active_model.update(&self.db).await?;

        tracing::info!(product_id = id, stock = new_stock, "Decremented stock");
        Ok(new_stock)
    }

    async fn increment_stock(&self, id: i32, quantity: i32) -> ProductResult<i32> {
        let model = self.find_by_id(id).await?.ok_or(ProductError::NotFound(id))?;

        let new_stock = model.stock + quantity;
        let mut active_model = model.into_active_model();
        active_model.stock = Set(new_stock);
        active_model.update(&self.db).await?;

        tracing::info!(product_id = id, stock = new_stock, "Incremented stock");
        Ok(new_stock)
    }
}
