//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Response};
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
    middleware::{RetryConfig, RetryMiddleware},
};

/// Mockable HTTP client trait
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a GET request; non-2xx statuses become `HttpError::HttpStatus`
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response>;

    /// Execute a GET request and decode the body as JSON
    async fn get_json(&self, url: &str, headers: HeaderMap) -> Result<serde_json::Value>;

    /// Execute a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<Response>;
}

/// Production HTTP client
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
    retry: RetryMiddleware,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        let retry_config = RetryConfig {
            max_attempts: config.retry_count,
            initial_delay: config.retry_delay,
            ..Default::default()
        };

        Ok(Self {
            inner,
            config,
            retry: RetryMiddleware::new(retry_config),
        })
    }

    /// Create HTTP client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Underlying reqwest client, for callers that build their own requests
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(HttpError::HttpStatus { status, message })
    }
}

fn parse_url(url: &str) -> Result<url::Url> {
    url.parse::<url::Url>()
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        debug!("HTTP GET: {}", url);
        let url = parse_url(url)?;

        self.retry
            .execute(|| {
                let request = self.inner.get(url.clone()).headers(headers.clone());
                async move { Self::check_status(request.send().await?).await }
            })
            .await
    }

    async fn get_json(&self, url: &str, headers: HeaderMap) -> Result<serde_json::Value> {
        let response = self.get(url, headers).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<Response> {
        debug!("HTTP POST: {}", url);
        let url = parse_url(url)?;

        // Bodies are not replayed, so POSTs are sent exactly once.
        let response = self
            .inner
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await
    }
}

/// Create a shared HTTP client (Arc-wrapped for cloning)
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn HttpClientTrait>> {
    Ok(Arc::new(HttpClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation_with_defaults() {
        let client = HttpClient::with_defaults();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_with_config() {
        let config = HttpConfig {
            timeout: Duration::from_secs(10),
            retry_count: 2,
            ..Default::default()
        };

        let client = HttpClient::new(config).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(10));
        assert_eq!(client.config().retry_count, 2);
    }

    #[test]
    fn test_invalid_proxy() {
        let config = HttpConfig::default().with_proxy("invalid-proxy");

        let result = HttpClient::new(config);
        assert!(matches!(result, Err(HttpError::InvalidProxy(_))));
    }

    #[tokio::test]
    async fn test_get_invalid_url() {
        let client = HttpClient::with_defaults().unwrap();
        let result = client.get("not a url", HeaderMap::new()).await;
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }
}
