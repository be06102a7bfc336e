//! `reqwest`-backed [`ApiTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tradepost_core::config::ClientConfig;
use tradepost_core::http::{ApiRequest, ApiResponse, ApiTransport, HttpMethod};
use tradepost_core::{Result, TradepostError};

/// Sends API requests over HTTP relative to a base URL such as
/// `http://localhost:8000/api`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TradepostError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        let method_name = match request.method {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        };

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!("[HTTP] {} {}", method_name, url);

        let response = builder
            .send()
            .await
            .map_err(|e| {
                TradepostError::network(format!("{} {} failed: {}", method_name, url, e))
            })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.bytes().await.map_err(|e| {
            TradepostError::network(format!("Failed to read response body from {}: {}", url, e))
        })?;

        tracing::debug!("[HTTP] {} {} -> {}", method_name, url, status.as_u16());

        Ok(ApiResponse::new(status.as_u16(), reason, body.to_vec()))
    }
}
