//! Request and Response models for the HTTP surface
//!
//! Request bodies are raw JSON values; these types carry validation and the
//! JSON bodies of the auxiliary endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_key, WriteRequest, MAX_KEY_LENGTH};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
