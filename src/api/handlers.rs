//! API Handlers
//!
//! HTTP request handlers for each catalog cache endpoint.
//!
//! The read path is cache-only: a miss is surfaced as 404 and the caller is
//! expected to consult durable storage and repopulate via PUT (cache-aside).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::cache::ShardedCache;
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::models::{
    DeleteProductResponse, HealthResponse, ProductId, ProductRecord, ProductResponse,
    PutProductRequest, PutProductResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The sharded product cache; internally locked per shard
    pub cache: Arc<ShardedCache<ProductId, ProductRecord>>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ShardedCache<ProductId, ProductRecord>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails fast on invalid cache parameters; no state is returned.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let cache = ShardedCache::new(config.cache_config())?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /products
///
/// Caches a product record under its id. This is the ingestion path's write
/// entry point as well as the cache-aside population call.
pub async fn put_product_handler(
    State(state): State<AppState>,
    Json(req): Json<PutProductRequest>,
) -> Result<Json<PutProductResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    state.cache.put(req.id, req.product);
    Ok(Json(PutProductResponse::new(req.id)))
}

/// Handler for GET /products/{id}
///
/// Returns the cached record, promoting its recency. A miss is 404.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    match state.cache.get(&id) {
        Some(product) => Ok(Json(ProductResponse::new(id, product))),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Handler for DELETE /products/{id}
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<DeleteProductResponse>> {
    if state.cache.remove(&id) {
        Ok(Json(DeleteProductResponse::new(id)))
    } else {
        Err(ApiError::NotFound(id))
    }
}

/// Handler for GET /cache/dump
///
/// Streams the whole cache in the binary snapshot format. Entry counts are
/// exposed as response headers so exporters can sanity-check the stream.
pub async fn dump_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut body = Vec::new();
    let report = state.cache.dump(&mut body)?;
    info!(
        written = report.entries_written,
        skipped = report.entries_skipped,
        "cache dump exported"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::HeaderName::from_static("x-entries-written"),
                report.entries_written.to_string(),
            ),
            (
                header::HeaderName::from_static("x-entries-skipped"),
                report.entries_skipped.to_string(),
            ),
        ],
        body,
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.shard_count()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;

    fn test_state() -> AppState {
        let cache = ShardedCache::new(CacheConfig {
            shard_count: 4,
            threshold: 64,
            low_watermark: 32,
        })
        .unwrap();
        AppState::new(cache)
    }

    fn sample_request(id: ProductId) -> PutProductRequest {
        serde_json::from_str(&format!(
            r#"{{"id":{id},"name":"desk","category":"furniture","price":100}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get_handler() {
        let state = test_state();

        let result = put_product_handler(State(state.clone()), Json(sample_request(1))).await;
        assert!(result.is_ok());

        let result = get_product_handler(State(state), Path(1)).await;
        let response = result.unwrap();
        assert_eq!(response.id, 1);
        assert_eq!(response.product.name, "desk");
    }

    #[tokio::test]
    async fn test_get_nonexistent_product() {
        let state = test_state();

        let result = get_product_handler(State(state), Path(999)).await;
        assert!(matches!(result, Err(ApiError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        put_product_handler(State(state.clone()), Json(sample_request(5)))
            .await
            .unwrap();

        let result = delete_product_handler(State(state.clone()), Path(5)).await;
        assert!(result.is_ok());

        let result = delete_product_handler(State(state), Path(5)).await;
        assert!(matches!(result, Err(ApiError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_put_invalid_request() {
        let state = test_state();

        let req: PutProductRequest =
            serde_json::from_str(r#"{"id":1,"name":"","category":"x"}"#).unwrap();
        let result = put_product_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        put_product_handler(State(state.clone()), Json(sample_request(1)))
            .await
            .unwrap();
        get_product_handler(State(state.clone()), Path(1)).await.unwrap();
        let _ = get_product_handler(State(state.clone()), Path(2)).await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.shard_count, 4);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
