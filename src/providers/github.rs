//! GitHub profile provider.
//!
//! Resolves the `github_profile` source from two REST calls issued in one
//! fetch pass: the user endpoint (repo and follower counts) and the repo
//! list (summed stargazers).

use super::{get_json, ProviderError, StatProvider};
use crate::config::FetchConfig;
use crate::models::{GithubStats, NormalizedStat, SourceId};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Raw shape of the GitHub user endpoint. Only the counters we publish are
/// kept; absent fields decode as 0.
#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
}

/// Provider for GitHub profile stats.
pub struct GithubProvider {
    user_url: String,
    repos_url: String,
}

impl GithubProvider {
    /// Build the provider for a handle against the configured API base.
    pub fn new(config: &FetchConfig, handle: &str) -> Self {
        Self {
            user_url: format!("{}/users/{}", config.github_api_url, handle),
            repos_url: format!(
                "{}/users/{}/repos?per_page=100",
                config.github_api_url, handle
            ),
        }
    }
}

impl StatProvider for GithubProvider {
    fn id(&self) -> SourceId {
        SourceId::GithubProfile
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError> {
        let (user, repos) = futures::try_join!(
            get_json::<UserResponse>(client, &self.user_url),
            get_json::<Value>(client, &self.repos_url),
        )?;

        let stars = sum_stars(&repos);
        debug!(repos = user.public_repos, stars, "github profile fetched");

        Ok(NormalizedStat::GithubProfile(GithubStats {
            repos: user.public_repos,
            followers: user.followers,
            stars,
        }))
    }
}

/// Sum `stargazers_count` across a repo-list response.
///
/// A non-array body (e.g. a rate-limit error object) sums to 0 rather than
/// failing the source; entries missing the field count as 0.
fn sum_stars(repos: &Value) -> u64 {
    match repos.as_array() {
        Some(entries) => entries
            .iter()
            .map(|repo| repo.get("stargazers_count").and_then(Value::as_u64).unwrap_or(0))
            .sum(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sum_stars() {
        let repos: Value = serde_json::json!([
            { "stargazers_count": 3 },
            { "stargazers_count": 5 },
            {}
        ]);
        assert_eq!(sum_stars(&repos), 8);
    }

    #[test]
    fn test_sum_stars_non_array_is_zero() {
        let error_object: Value = serde_json::json!({
            "message": "API rate limit exceeded",
            "documentation_url": "https://docs.github.com"
        });
        assert_eq!(sum_stars(&error_object), 0);
    }

    #[test]
    fn test_sum_stars_empty_list() {
        assert_eq!(sum_stars(&serde_json::json!([])), 0);
    }

    #[test]
    fn test_user_response_defaults() {
        let user: UserResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(user.public_repos, 0);
        assert_eq!(user.followers, 0);
    }

    #[tokio::test]
    async fn test_fetch_combines_user_and_repos() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "public_repos": 8,
                "followers": 20
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "stargazers_count": 3 },
                { "stargazers_count": 5 }
            ])))
            .mount(&server)
            .await;

        let config = FetchConfig {
            github_api_url: server.uri(),
            ..FetchConfig::default()
        };
        let provider = GithubProvider::new(&config, "octocat");
        let client = reqwest::Client::new();

        let stat = provider.fetch(&client).await.unwrap();
        assert_eq!(
            stat,
            NormalizedStat::GithubProfile(GithubStats {
                repos: 8,
                followers: 20,
                stars: 8,
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_fails_on_user_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let config = FetchConfig {
            github_api_url: server.uri(),
            ..FetchConfig::default()
        };
        let provider = GithubProvider::new(&config, "octocat");
        let client = reqwest::Client::new();

        assert!(matches!(
            provider.fetch(&client).await,
            Err(ProviderError::HttpStatus(_))
        ));
    }
}
