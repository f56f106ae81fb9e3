// src/services/fetcher.rs

//! Origin page fetching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http::create_async_client;

/// Something that can produce the raw latest-updates document.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body.
    async fn fetch_page(&self) -> Result<String>;

    /// Where the page comes from, for logs.
    fn describe(&self) -> String;
}

/// Fetches the page over HTTP with bounded retries on transient failures.
pub struct HttpSource {
    client: Client,
    url: String,
    retries: u32,
    backoff: Duration,
}

impl HttpSource {
    /// Create a source from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            url: config.url.clone(),
            retries: config.retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn fetch_once(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(body) => return Ok(body),
                Err(error) if error.is_transient() && attempt < self.retries => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    log::warn!(
                        "Fetch attempt {}/{} for {} failed: {}. Retrying in {:?}",
                        attempt,
                        self.retries + 1,
                        self.url,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source_for(server: &MockServer, retries: u32) -> HttpSource {
        source_with_timeout(server, retries, 5)
    }

    fn source_with_timeout(server: &MockServer, retries: u32, timeout_secs: u64) -> HttpSource {
        let config = SourceConfig {
            url: server.url("/"),
            retries,
            retry_backoff_ms: 0,
            timeout_secs,
            ..SourceConfig::default()
        };
        HttpSource::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/").header_exists("user-agent");
                then.status(200).body("<html>ok</html>");
            })
            .await;

        let body = source_for(&server, 2).fetch_page().await.unwrap();
        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sends_browser_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .header("sec-fetch-mode", "navigate")
                    .header("accept-language", "en-US,en;q=0.9");
                then.status(200).body("ok");
            })
            .await;

        source_for(&server, 0).fetch_page().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(403);
            })
            .await;

        let err = source_for(&server, 2).fetch_page().await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 403, .. }));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(503);
            })
            .await;

        let err = source_for(&server, 2).fetch_page().await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 503, .. }));
        mock.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn test_slow_origin_times_out_and_is_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .body("too late")
                    .delay(Duration::from_secs(3));
            })
            .await;

        let err = source_with_timeout(&server, 1, 1)
            .fetch_page()
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::Http(e) if e.is_timeout()));
        assert!(err.is_transient());
        mock.assert_hits_async(2).await;
    }
}
