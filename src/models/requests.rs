//! Request DTOs for the catalog cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use super::product::{ProductId, ProductRecord};

/// Request body for the upsert operation (PUT /products)
///
/// # Fields
/// - `id`: The product id to cache the record under
/// - `product`: The product record to store (flattened into the body)
#[derive(Debug, Clone, Deserialize)]
pub struct PutProductRequest {
    /// The product id
    pub id: ProductId,
    /// The product record
    #[serde(flatten)]
    pub product: ProductRecord,
}

impl PutProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.product.name.is_empty() {
            return Some("Product name cannot be empty".to_string());
        }
        if self.product.category.is_empty() {
            return Some("Product category cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_deserialize() {
        let json = r#"{"id": 42, "name": "desk", "category": "furniture"}"#;
        let req: PutProductRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, 42);
        assert_eq!(req.product.name, "desk");
        assert_eq!(req.product.category, "furniture");
        assert_eq!(req.product.price, 0);
    }

    #[test]
    fn test_put_request_deserialize_full() {
        let json = r#"{"id":1,"name":"lamp","category":"lighting","location":"a1","color":"red","price":999,"amount":3}"#;
        let req: PutProductRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.product.color, "red");
        assert_eq!(req.product.amount, 3);
    }

    #[test]
    fn test_validate_empty_name() {
        let req: PutProductRequest =
            serde_json::from_str(r#"{"id":1,"name":"","category":"x"}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_empty_category() {
        let req: PutProductRequest =
            serde_json::from_str(r#"{"id":1,"name":"x","category":""}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req: PutProductRequest =
            serde_json::from_str(r#"{"id":1,"name":"x","category":"y"}"#).unwrap();
        assert!(req.validate().is_none());
    }
}
