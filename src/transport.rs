//! HTTP transport seam for the findash SDK
//!
//! The request client talks to the network through the [`Transport`] trait
//! so tests can substitute a deterministic fake. The real implementation is
//! a thin reqwest wrapper; its cookie store is what carries the HTTP-only
//! refresh-token cookie between calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::config::ClientConfig;
use crate::error::Result;

/// Immutable description of one outbound call
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
            bearer: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a bearer credential; `None` leaves the request anonymous
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Raw response as it came off the wire
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Dispatches a request and returns whatever the server said
///
/// An `Err` means the request was sent but no response arrived; HTTP error
/// statuses come back as an `Ok` response for the caller to interpret.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<WireResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .cookie_store(true);

        if !config.use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<WireResponse> {
        let mut request_builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header("Content-Type", "application/json");

        if !request.query.is_empty() {
            request_builder = request_builder.query(&request.query);
        }

        if let Some(token) = &request.bearer {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(body) = &request.body {
            request_builder = request_builder.json(body);
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(WireResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = OutboundRequest::get("https://api.example.com/financial/wallet")
            .with_query("limit", "5")
            .with_bearer(Some("tok".to_string()));

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("limit".to_string(), "5".to_string())]);
        assert_eq!(request.bearer.as_deref(), Some("tok"));
        assert!(request.body.is_none());

        let request = OutboundRequest::post(
            "https://api.example.com/users/login",
            serde_json::json!({"email": "a@b.c"}),
        );
        assert_eq!(request.method, Method::POST);
        assert!(request.body.is_some());
        assert!(request.bearer.is_none());
    }

    #[test]
    fn test_wire_response_success_range() {
        assert!(WireResponse { status: 200, body: String::new() }.is_success());
        assert!(WireResponse { status: 204, body: String::new() }.is_success());
        assert!(!WireResponse { status: 301, body: String::new() }.is_success());
        assert!(!WireResponse { status: 401, body: String::new() }.is_success());
        assert!(!WireResponse { status: 500, body: String::new() }.is_success());
    }
}
