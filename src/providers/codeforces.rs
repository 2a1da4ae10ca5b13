//! Codeforces provider.
//!
//! Resolves the `codeforces` source from the official `user.info` API.

use super::{get_json, ProviderError, StatProvider};
use crate::config::FetchConfig;
use crate::models::{CodeforcesStats, NormalizedStat, SourceId};
use serde::Deserialize;

/// Raw shape of the `user.info` response.
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    result: Vec<UserInfo>,
}

/// One user entry. Unrated accounts carry neither field.
#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    rating: u64,
    rank: Option<String>,
}

/// Provider for Codeforces rating and rank.
pub struct CodeforcesProvider {
    url: String,
}

impl CodeforcesProvider {
    /// Build the provider for a handle against the configured API base.
    pub fn new(config: &FetchConfig, handle: &str) -> Self {
        Self {
            url: format!("{}/user.info?handles={}", config.codeforces_api_url, handle),
        }
    }
}

impl StatProvider for CodeforcesProvider {
    fn id(&self) -> SourceId {
        SourceId::Codeforces
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError> {
        let response: UserInfoResponse = get_json(client, &self.url).await?;
        normalize(response)
    }
}

/// Require an OK status and at least one result entry. Rating defaults to 0
/// and rank to "Unrated" for accounts that have never competed.
fn normalize(response: UserInfoResponse) -> Result<NormalizedStat, ProviderError> {
    if response.status != "OK" {
        return Err(ProviderError::ShapeMismatch(format!(
            "unexpected status {:?}",
            response.status
        )));
    }

    let user = response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ShapeMismatch("empty result array".to_string()))?;

    Ok(NormalizedStat::Codeforces(CodeforcesStats {
        rating: user.rating,
        rank: user.rank.unwrap_or_else(|| "Unrated".to_string()),
    }))
}
