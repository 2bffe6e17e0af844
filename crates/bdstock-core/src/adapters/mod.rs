mod cse;
mod dse;

use std::sync::Arc;

use crate::config::ExchangeConfig;
use crate::exchange::ExchangeError;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::ExchangeId;

pub use cse::CseAdapter;
pub use dse::DseAdapter;

/// Single-shot page download shared by both adapters.
#[derive(Clone)]
struct PageFetcher {
    exchange: ExchangeId,
    base_url: String,
    timeout_ms: u64,
    user_agent: String,
    http_client: Arc<dyn HttpClient>,
}

impl PageFetcher {
    fn new(
        exchange: ExchangeId,
        base_url: &str,
        config: &ExchangeConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            exchange,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
            user_agent: config.user_agent.clone(),
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Downloads `path` and returns the body of a 2xx response.
    async fn fetch(&self, path: &str) -> Result<String, ExchangeError> {
        let url = self.url(path);
        tracing::debug!(exchange = %self.exchange, %url, "fetching page");
        self.send(HttpRequest::get(url)).await
    }

    /// Posts `fields` as a url-encoded form to `path`.
    async fn submit(&self, path: &str, fields: &[(&str, &str)]) -> Result<String, ExchangeError> {
        let url = self.url(path);
        tracing::debug!(exchange = %self.exchange, %url, fields = fields.len(), "posting form");
        self.send(HttpRequest::post_form(url, fields)).await
    }

    async fn send(&self, request: HttpRequest) -> Result<String, ExchangeError> {
        let url = request.url.clone();
        let request = request
            .with_header("user-agent", self.user_agent.as_str())
            .with_header("accept", "text/html")
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| ExchangeError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.is_success() {
            tracing::warn!(exchange = %self.exchange, %url, status = response.status, "non-success status");
            return Err(ExchangeError::Status {
                status: response.status,
                url,
            });
        }

        if !response.is_html() {
            tracing::warn!(
                exchange = %self.exchange,
                %url,
                content_type = response.content_type.as_deref().unwrap_or_default(),
                "page is not declared as HTML"
            );
        }

        Ok(response.body)
    }
}

fn default_http_client() -> Arc<dyn HttpClient> {
    Arc::new(ReqwestHttpClient::new())
}
