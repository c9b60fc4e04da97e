//! HTTP transport
//!
//! The client only builds requests and decodes responses; executing them is
//! left to a [`Transport`]. [`ReqwestTransport`] is the default.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::request::{ApiRequest, HttpMethod};

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes a single request. Errors are passed to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse>;
}

/// Transport backed by a `reqwest::Client`
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    const USER_AGENT: &'static str = concat!("gbif-species-rs/", env!("CARGO_PKG_VERSION"));

    /// Create a transport with default settings (30 second timeout)
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a transport with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// Wrap an already configured client
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        builder = builder.header("Accept", "application/json");
        if let Some(content_type) = request.content_type {
            builder = builder.header("Content-Type", content_type);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: vec![],
        };
        assert!(ok.is_success());
        let not_found = HttpResponse {
            status: 404,
            body: b"not found".to_vec(),
        };
        assert!(!not_found.is_success());
        assert_eq!(not_found.body_text(), "not found");
    }

    #[tokio::test]
    async fn test_malformed_url_surfaces_as_transport_error() {
        let transport = ReqwestTransport::new();
        let request = ApiRequest::get("not a url//species/1".to_string());
        let err = transport.execute(&request).await.unwrap_err();
        assert!(matches!(err, crate::GbifError::Transport(_)));
    }
}
