use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::errors::FetchError;

/// User agent string sent to feed origins.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues exactly one GET per call. Timeouts and redirects are the client's
/// defaults; callers that need bounded latency wrap the call themselves.
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        debug!(url, bytes = body.len(), "fetched feed document");
        Ok(body)
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<feed/>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new();
        let body = fetcher
            .fetch(&format!("{}/feed", server.uri()))
            .await
            .unwrap();

        assert_eq!(&body[..], b"<feed/>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Error response"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new();
        let result = fetcher.fetch(&server.uri()).await;

        match result {
            Err(FetchError::Status { status, .. }) => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN)
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new();
        assert!(fetcher.fetch(&server.uri()).await.is_err());
        // Expectation of a single request is verified when the server drops
    }

    #[tokio::test]
    async fn test_fetch_honours_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<feed/>")
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let fetcher = HttpFeedFetcher::with_client(client);

        match fetcher.fetch(&server.uri()).await {
            Err(FetchError::Transport { source, .. }) => assert!(source.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let fetcher = HttpFeedFetcher::new();
        let result = fetcher.fetch("http://127.0.0.1:1/feed").await;

        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
