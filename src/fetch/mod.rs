//! Fetch Module
//!
//! Upstream HTTP access behind a trait so polling and handlers can be tested
//! without the network.

mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

pub use client::HttpFetcher;

/// Source of upstream documents.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    /// GETs `url` and parses the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// GETs `url` and returns the XML body as text.
    async fn get_xml(&self, url: &str) -> Result<String, FetchError>;
}

/// True for payloads that mean "nothing to show": `null` or an empty array.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
