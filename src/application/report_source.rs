// Report source trait and the fetch error taxonomy

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Everything that can go wrong between issuing a request and having a
/// usable payload. All four cases are handled the same way by the refresh
/// pipeline (log + per-widget failure policy) and by the proxy relay
/// (empty fallback body); the split exists for the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid JSON from {url}: {message}")]
    Parse { url: String, message: String },
    #[error("unexpected payload from {url}: {message}")]
    Shape { url: String, message: String },
}

impl FetchError {
    pub fn shape(url: &str, message: impl Into<String>) -> Self {
        FetchError::Shape {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Issue one GET and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}
