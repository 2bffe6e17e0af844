//! Page transport.
//!
//! Both exchanges serve plain HTML. Most pages are a GET; the CSE archive
//! pages take a url-encoded form POST. Adapters depend on the [`HttpClient`]
//! trait; [`ReqwestHttpClient`] is the production implementation and tests
//! substitute an in-memory one.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Deadline applied when a request does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request for one exchange page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Lowercased header names.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// POST of url-encoded `fields`, in the order given.
    pub fn post_form(url: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        let body = fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        Self::new(HttpMethod::Post, url)
            .with_header("content-type", FORM_CONTENT_TYPE)
            .with_body(body)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Status line and decoded body of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// `200 OK` carrying an HTML document.
    pub fn ok_html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some(String::from("text/html; charset=utf-8")),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// `false` only when the server declared a non-HTML content type.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |value| value.to_ascii_lowercase().contains("html"))
    }
}

/// The page could not be downloaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("no response within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("could not read the response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl HttpError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Page transport used by the exchange adapters.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a>;
}

/// Production transport backed by reqwest.
///
/// Cookies set by the exchange pages are kept for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "cookie-enabled client unavailable, using defaults");
                reqwest::Client::new()
            });

        Self::with_client(client)
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let timeout_ms = request.timeout_ms;
            let start = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };
            let mut builder = request
                .headers
                .iter()
                .fold(start, |builder, (name, value)| {
                    builder.header(name.as_str(), value.as_str())
                })
                .timeout(Duration::from_millis(timeout_ms));
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|error| {
                if error.is_timeout() {
                    HttpError::Timeout { timeout_ms }
                } else if error.is_connect() {
                    HttpError::Connect(error.to_string())
                } else {
                    HttpError::Other(error.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await.map_err(|error| {
                if error.is_timeout() {
                    HttpError::Timeout { timeout_ms }
                } else {
                    HttpError::Body(error.to_string())
                }
            })?;

            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::get("https://www.dsebd.org/")
            .with_header("Accept-Language", "en-GB")
            .with_timeout_ms(2_500);

        assert_eq!(request.header("accept-language"), Some("en-GB"));
        assert_eq!(request.header("ACCEPT-LANGUAGE"), Some("en-GB"));
        assert_eq!(request.timeout_ms, 2_500);
    }

    #[test]
    fn form_posts_encode_fields_in_order() {
        let request = HttpRequest::post_form(
            "https://www.cse.com.bd/market/pe_ratio",
            &[("pe_date", "2020-07-16"), ("note", "a&b c")],
        );

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(request.body.as_deref(), Some("pe_date=2020-07-16&note=a%26b%20c"));
        assert_eq!(HttpRequest::get("https://www.dsebd.org/").body, None);
    }

    #[test]
    fn only_2xx_is_success() {
        assert!(HttpResponse::ok_html("<html></html>").is_success());
        assert!(!HttpResponse::ok_html("").with_status(301).is_success());
        assert!(!HttpResponse::ok_html("").with_status(503).is_success());
    }

    #[test]
    fn declared_json_is_not_html() {
        let mut response = HttpResponse::ok_html("{}");
        assert!(response.is_html());

        response.content_type = Some(String::from("application/json"));
        assert!(!response.is_html());

        response.content_type = None;
        assert!(response.is_html());
    }

    #[test]
    fn timeout_errors_name_the_deadline() {
        let error = HttpError::Timeout { timeout_ms: 2_500 };
        assert!(error.is_timeout());
        assert_eq!(error.to_string(), "no response within 2500 ms");
        assert!(!HttpError::Connect(String::from("refused")).is_timeout());
    }
}
