//! The seam between the engines and the actual HTTP stack.
//!
//! The engines only shape requests and interpret responses; sockets, TLS,
//! timeouts and retry policy belong to the [`Transport`] implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;

/// HTTP methods the engines use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Request descriptor handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Response descriptor returned by the transport.
///
/// Non-success statuses are ordinary responses here; only failures to reach
/// the provider at all are transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Asynchronous request executor injected into the engines.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// Transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a 30 second request timeout.
    pub fn new() -> Result<Self, BoxError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a transport with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Wrap an existing client, keeping whatever it is configured with.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { url, status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn passes_headers_and_reports_non_success_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resource"))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().expect("transport");
        let response = transport
            .send(HttpRequest {
                url: format!("{}/resource", server.uri()),
                method: HttpMethod::Get,
                headers: vec![("Authorization".into(), "Bearer token-1".into())],
                body: None,
            })
            .await
            .expect("send");

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "nope");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::with_timeout(Duration::from_millis(200)).expect("transport");
        let result = transport
            .send(HttpRequest {
                url: "http://127.0.0.1:9/token".into(),
                method: HttpMethod::Post,
                headers: Vec::new(),
                body: Some(String::new()),
            })
            .await;
        assert!(result.is_err());
    }
}
