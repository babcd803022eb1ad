//! Response DTOs for the catalog cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::product::{ProductId, ProductRecord};

/// Response body for a product lookup (GET /products/{id})
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    /// The requested product id
    pub id: ProductId,
    /// The cached product record
    #[serde(flatten)]
    pub product: ProductRecord,
}

impl ProductResponse {
    /// Creates a new ProductResponse
    pub fn new(id: ProductId, product: ProductRecord) -> Self {
        Self { id, product }
    }
}

/// Response body for the upsert operation (PUT /products)
#[derive(Debug, Clone, Serialize)]
pub struct PutProductResponse {
    /// Success message
    pub message: String,
    /// The product id that was cached
    pub id: ProductId,
}

impl PutProductResponse {
    /// Creates a new PutProductResponse
    pub fn new(id: ProductId) -> Self {
        Self {
            message: format!("Product {} cached successfully", id),
            id,
        }
    }
}

/// Response body for the delete operation (DELETE /products/{id})
#[derive(Debug, Clone, Serialize)]
pub struct DeleteProductResponse {
    /// Success message
    pub message: String,
    /// The product id that was removed
    pub id: ProductId,
}

impl DeleteProductResponse {
    /// Creates a new DeleteProductResponse
    pub fn new(id: ProductId) -> Self {
        Self {
            message: format!("Product {} removed from cache", id),
            id,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Number of shards
    pub shard_count: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from merged cache statistics
    pub fn new(stats: &crate::cache::CacheStats, shard_count: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            shard_count,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
