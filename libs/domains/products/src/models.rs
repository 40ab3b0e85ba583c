use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product entity - matches the products table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned by the store on creation
    pub id: i32,
    /// Product name
    pub name: String,
    /// Optional product description
    pub description: Option<String>,
    /// Price in minor currency units (cents)
    pub price: i64,
    /// Current stock quantity
    pub stock: i32,
}

/// DTO for creating a new product
///
/// The id is assigned by the store; callers never supply one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in minor currency units (cents)
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
}

/// DTO for replacing an existing product
///
/// Updates are wholesale: every mutable field is replaced. The embedded id
/// must match the route id and is never written.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    pub id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in minor currency units (cents)
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
}

impl Product {
    /// Build a product from a creation DTO and a store-assigned id
    pub fn new(id: i32, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
        }
    }

    /// Replace every mutable field from the replacement DTO, keeping the id
    pub fn apply_replacement(&mut self, replacement: UpdateProduct) {
        self.name = replacement.name;
        self.description = replacement.description;
        self.price = replacement.price;
        self.stock = replacement.stock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_product_rejects_negative_price() {
        let input = CreateProduct {
            name: "Widget".to_string(),
            description: None,
            price: -1,
            stock: 0,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_rejects_negative_stock() {
        let input = CreateProduct {
            name: "Widget".to_string(),
            description: None,
            price: 0,
            stock: -1,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_rejects_empty_name() {
        let input = CreateProduct {
            name: String::new(),
            description: None,
            price: 100,
            stock: 1,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_accepts_zero_price_and_stock() {
        let input = CreateProduct {
            name: "Freebie".to_string(),
            description: None,
            price: 0,
            stock: 0,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_apply_replacement_keeps_id() {
        let mut product = Product::new(
            7,
            CreateProduct {
                name: "Old".to_string(),
                description: None,
                price: 100,
                stock: 1,
            },
        );

        product.apply_replacement(UpdateProduct {
            id: 7,
            name: "New".to_string(),
            description: Some("Desc".to_string()),
            price: 200,
            stock: 3,
        });

        assert_eq!(product.id, 7);
        assert_eq!(product.name, "New");
        assert_eq!(product.description.as_deref(), Some("Desc"));
        assert_eq!(product.price, 200);
        assert_eq!(product.stock, 3);
    }
}
