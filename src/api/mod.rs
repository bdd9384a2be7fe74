//! API Module
//!
//! HTTP handlers and routing for the key-value façade.
//!
//! # Endpoints
//! - `POST /:key` - Create a record
//! - `PUT /:key` - Replace an existing record
//! - `GET /:key` - Read a record
//! - `DELETE /:key` - Remove a record
//! - `GET /-/stats` - Read path statistics
//! - `GET /-/health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
