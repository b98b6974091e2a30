//! API Module
//!
//! HTTP handlers and routing exposing one cache tower over REST.
//!
//! # Endpoints
//! - `PUT /set` - Write a key-value pair through every layer
//! - `GET /get/:key` - Cascading read with promotion
//! - `DELETE /del/:key` - Delete a key from every layer
//! - `DELETE /clear` - Clear every layer
//! - `GET /layers` - Describe the layer stack
//! - `GET /stats` - Get tower statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
