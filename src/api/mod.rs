//! API Module
//!
//! HTTP handlers and routing for the catalog cache REST API.
//!
//! # Endpoints
//! - `PUT /products` - Cache a product record
//! - `GET /products/:id` - Retrieve a cached product
//! - `DELETE /products/:id` - Remove a product from the cache
//! - `GET /cache/dump` - Export the cache as a binary snapshot stream
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
