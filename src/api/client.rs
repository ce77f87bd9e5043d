// IPS Console - HTTP Client
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! reqwest-backed gateway to the backend's HTTP API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ApiRequest, ApiResponse, Gateway, Method};

/// Gateway that speaks HTTP to a live backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway rooted at `base_url` (e.g. `http://host/API/`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("ips-console/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> ApiResponse {
        let url = self.url(&request.path);
        debug!("{} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url).form(&request.form),
            Method::Delete => self.client.delete(&url).form(&request.form),
        };

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("{} {} failed: {}", request.method, url, e);
                return ApiResponse::unreachable(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read response body from {}: {}", url, e);
                String::new()
            }
        };

        debug!("{} {} -> {}", request.method, url, status);
        ApiResponse { status, body }
    }
}
