//! Stat providers for the external platforms.
//!
//! Each provider resolves one source: it issues a single fetch against the
//! platform's public endpoint and normalizes the raw response into a
//! fixed-shape record. JSON-API providers and the scrape provider implement
//! the same [`StatProvider`] contract, so a scrape path can be swapped for a
//! stable API without touching the aggregation layer.

pub mod codechef;
pub mod codeforces;
pub mod contributions;
pub mod github;
pub mod leetcode;

pub use codechef::CodechefProvider;
pub use codeforces::CodeforcesProvider;
pub use contributions::ContributionsProvider;
pub use github::GithubProvider;
pub use leetcode::LeetcodeProvider;

use crate::models::{NormalizedStat, SourceId};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a source failed to resolve.
///
/// The distinction only matters for logs; every kind is masked by the same
/// fallback literal at the aggregation boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The body could not be decoded as the expected format.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The body decoded but did not carry the required fields.
    #[error("response shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl ProviderError {
    /// Short error-kind label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::HttpStatus(_) => "http_status",
            ProviderError::Parse(_) => "parse",
            ProviderError::ShapeMismatch(_) => "shape_mismatch",
        }
    }
}

/// One pluggable stat source: a single fetch attempt producing a normalized
/// record, or a [`ProviderError`] routed to the fallback policy.
pub trait StatProvider {
    /// The source this provider resolves.
    fn id(&self) -> SourceId;

    /// Fetch and normalize. One attempt, no retry; the shared client's
    /// timeout bounds the call.
    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError>;
}

/// Map a reqwest transport error to the provider taxonomy.
fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Network(format!("request timed out: {}", err))
    } else if err.is_connect() {
        ProviderError::Network(format!("connection failed: {}", err))
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// GET a URL and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, ProviderError> {
    let response = client.get(url).send().await.map_err(map_send_error)?;

    if !response.status().is_success() {
        return Err(ProviderError::HttpStatus(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// GET a URL and return the raw text body.
pub(crate) async fn get_text(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, ProviderError> {
    let response = client.get(url).send().await.map_err(map_send_error)?;

    if !response.status().is_success() {
        return Err(ProviderError::HttpStatus(response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(ProviderError::Network("x".to_string()).kind(), "network");
        assert_eq!(
            ProviderError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY).kind(),
            "http_status"
        );
        assert_eq!(ProviderError::Parse("x".to_string()).kind(), "parse");
        assert_eq!(
            ProviderError::ShapeMismatch("x".to_string()).kind(),
            "shape_mismatch"
        );
    }

    #[tokio::test]
    async fn test_get_json_non_success_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/boom", server.uri());
        let result: Result<serde_json::Value, _> = get_json(&client, &url).await;

        match result {
            Err(ProviderError::HttpStatus(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_malformed_body() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/junk"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/junk", server.uri());
        let result: Result<serde_json::Value, _> = get_json(&client, &url).await;

        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }
}
