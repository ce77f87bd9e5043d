// IPS Console - API Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Request/response boundary to the IPS backend.
//!
//! Everything the console knows about the backend goes through a
//! [`Gateway`]: one request in, one `(status, body)` pair out. Transport
//! failures are folded into status `0` so callers only ever classify codes.

mod client;
pub mod endpoints;
#[cfg(test)]
pub mod testing;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub use client::HttpGateway;

/// Default API root of a local backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1/API/";

/// HTTP verbs the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// A request relative to the API root, with a form-encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        self.form.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of a form field, if present.
    #[cfg(test)]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Normalized backend answer. `status == 0` means no HTTP answer at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::new(0, reason)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx answer into its [`ApiError`].
    pub fn into_result(self) -> Result<String, ApiError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }

    /// Decode a successful JSON body.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let body = self.into_result()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The only way the console talks to the backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_classification() {
        assert_eq!(ApiResponse::ok("[]").into_result(), Ok("[]".to_string()));
        assert_eq!(
            ApiResponse::new(418, "").into_result(),
            Err(ApiError::NotRunning)
        );
        assert!(matches!(
            ApiResponse::unreachable("connection refused").into_result(),
            Err(ApiError::Unreachable(_))
        ));
    }

    #[test]
    fn test_json_decode_error() {
        let result: Result<Vec<u32>, _> = ApiResponse::ok("<html>").json();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_request_fields() {
        let req = ApiRequest::post("services/3/blocked")
            .field("ip_address", "10.0.0.1")
            .field("block", true);
        assert_eq!(req.value("block"), Some("true"));
        assert_eq!(req.value("missing"), None);
        assert_eq!(req.method.to_string(), "POST");
    }
}
