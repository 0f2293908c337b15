//! HTTP page fetching.
//!
//! One GET per URL with a browser user agent and a fixed timeout. A failed
//! fetch is reported to the caller, which skips the page; nothing here retries.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Errors from fetching a single page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Browser fetch failed: {0}")]
    Browser(String),
}

/// Anything that can turn a URL into page HTML.
///
/// The pipeline only depends on this trait so alternative transports (the
/// headless browser, test fakes) can stand in for [`HttpClient`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client used for seed and candidate pages.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    /// - `user_agent_config`: None for the default desktop agent,
    ///   `Some("impersonate")` for a random real browser agent, or a custom string.
    pub fn new(timeout: Duration, user_agent_config: Option<&str>) -> Result<Self, FetchError> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .build()?;

        Ok(Self { client, user_agent })
    }

    /// The user agent string sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Make a single GET request.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let start = Instant::now();
        let response = self.client.get(parsed).send().await?;
        let response = HttpResponse::new(response);

        debug!(
            "GET {} -> {} in {}ms ({})",
            url,
            response.status.as_u16(),
            start.elapsed().as_millis(),
            response.content_type().unwrap_or("unknown type")
        );

        Ok(response)
    }

    /// Get page content as text, treating any non-2xx status as a failure.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get_text(url).await
    }
}

/// Tries `primary` first and falls back to `secondary` when it fails.
///
/// Used to put the headless browser behind plain HTTP: the browser only sees
/// pages the HTTP client could not load.
pub struct FallbackFetcher<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackFetcher<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P: PageFetcher, S: PageFetcher> PageFetcher for FallbackFetcher<P, S> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match self.primary.fetch(url).await {
            Ok(html) => Ok(html),
            Err(e) => {
                debug!("Primary fetch failed for {}: {}, trying fallback", url, e);
                self.secondary.fetch(url).await
            }
        }
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, u16>);

    #[async_trait]
    impl PageFetcher for Fixed {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                }),
            }
        }
    }

    #[test]
    fn test_client_uses_default_agent() {
        let client = HttpClient::new(Duration::from_secs(10), None).unwrap();
        assert_eq!(client.user_agent(), USER_AGENT);
    }

    #[tokio::test]
    async fn test_get_rejects_invalid_url() {
        let client = HttpClient::new(Duration::from_secs(1), None).unwrap();
        let err = client.get_text("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fallback_used_only_on_failure() {
        let fetcher = FallbackFetcher::new(Fixed(Err(503)), Fixed(Ok("<p>rendered</p>")));
        assert_eq!(
            fetcher.fetch("https://example.com").await.unwrap(),
            "<p>rendered</p>"
        );

        let fetcher = FallbackFetcher::new(Fixed(Ok("<p>plain</p>")), Fixed(Ok("<p>rendered</p>")));
        assert_eq!(
            fetcher.fetch("https://example.com").await.unwrap(),
            "<p>plain</p>"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            url: "https://example.com/x".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/x");
    }
}
