// Reqwest-backed report source

use crate::application::report_source::{FetchError, ReportSource};
use crate::infrastructure::config::UpstreamSettings;
use crate::infrastructure::sample_data;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub struct ReportClient {
    client: reqwest::Client,
}

impl ReportClient {
    pub fn new(upstream: &UpstreamSettings) -> anyhow::Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_millis(upstream.timeout_ms));

        if upstream.insecure_no_verify {
            tracing::warn!(
                "upstream TLS certificate validation is DISABLED (upstream.insecure_no_verify)"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ReportSource for ReportClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        // `sample:<name>` resolves to the built-in sample payloads, the
        // same ones the sample API endpoints serve.
        if let Some(name) = url.strip_prefix("sample:") {
            return sample_data::by_name(name).ok_or_else(|| FetchError::Network {
                url: url.to_string(),
                message: "unknown sample source".to_string(),
            });
        }

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
