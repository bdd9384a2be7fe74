//! Inbound request decoding
//!
//! Bodies are parsed as JSON whatever their content type, so plain
//! `curl -d 125` works as well as a JSON client.

use serde_json::Value;

use crate::error::{Result, StoreError};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Validates a record key taken from the request path.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// A create or replace request: path key plus decoded JSON body.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// The record key
    pub key: String,
    /// The payload, any JSON value
    pub value: Value,
}

impl WriteRequest {
    /// Validates `key` and decodes `body` as JSON.
    pub fn from_body(key: String, body: &[u8]) -> Result<Self> {
        validate_key(&key)?;
        let value = serde_json::from_slice(body)
            .map_err(|e| StoreError::MalformedPayload(e.to_string()))?;
        Ok(Self { key, value })
    }
}
