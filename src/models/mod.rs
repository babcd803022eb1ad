//! Product and API models for the catalog cache service
//!
//! Defines the cached product record and the DTOs (Data Transfer Objects)
//! used for serializing/deserializing HTTP request and response bodies.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::{ProductId, ProductRecord};
pub use requests::PutProductRequest;
pub use responses::{
    DeleteProductResponse, HealthResponse, ProductResponse, PutProductResponse, StatsResponse,
};
