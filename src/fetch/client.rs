//! HTTP Fetcher
//!
//! reqwest-backed implementation of the upstream fetch seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde_json::Value;
use tracing::debug;

use super::Fetch;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("paddock/", env!("CARGO_PKG_VERSION"));

/// Fetches upstream documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET and rejects non-success status codes and bodies whose
    /// declared content type does not contain `expected`.
    async fn send_checked(&self, url: &str, expected: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.contains(expected) {
            return Err(FetchError::UnexpectedContentType {
                content_type,
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.send_checked(url, "json").await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_xml(&self, url: &str) -> Result<String, FetchError> {
        let response = self.send_checked(url, "xml").await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, http::StatusCode, routing::get, Router};

    /// Serves `app` on a free loopback port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn upstream() -> Router {
        Router::new()
            .route(
                "/broken",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        [(header::CONTENT_TYPE, "text/html")],
                        "<h1>oops</h1>",
                    )
                }),
            )
            .route(
                "/maintenance",
                get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<h1>back soon</h1>") }),
            )
            .route(
                "/weather",
                get(|| async { ([(header::CONTENT_TYPE, "application/json")], "[]") }),
            )
            .route(
                "/results",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
                        "<MRData/>",
                    )
                }),
            )
    }

    #[test]
    fn test_builds_with_timeout() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let fetcher = HttpFetcher::new(Duration::from_millis(500)).unwrap();

        let err = fetcher
            .get_json(&format!("http://127.0.0.1:{port}/v1/weather"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_error_status_checked_before_content_type() {
        let base = serve(upstream()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.get_json(&format!("{base}/broken")).await.unwrap_err();
        assert!(
            matches!(err, FetchError::HttpStatus { status: 500, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_html_body_is_unexpected_content_type() {
        let base = serve(upstream()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher
            .get_json(&format!("{base}/maintenance"))
            .await
            .unwrap_err();
        match err {
            FetchError::UnexpectedContentType { content_type, .. } => {
                assert_eq!(content_type, "text/html")
            }
            other => panic!("got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_json_array_is_ok() {
        let base = serve(upstream()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let value = fetcher.get_json(&format!("{base}/weather")).await.unwrap();
        assert_eq!(value, Value::Array(Vec::new()));
        assert!(crate::fetch::is_empty_payload(&value));
    }

    #[tokio::test]
    async fn test_xml_body_returned_as_text() {
        let base = serve(upstream()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let body = fetcher.get_xml(&format!("{base}/results")).await.unwrap();
        assert_eq!(body, "<MRData/>");

        let err = fetcher.get_xml(&format!("{base}/weather")).await.unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedContentType { .. }));
    }
}
