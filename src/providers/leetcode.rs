//! LeetCode provider.
//!
//! Resolves the `leetcode` source from a community stats API that mirrors
//! LeetCode profile data as JSON. LeetCode itself has no public REST API.

use super::{get_json, ProviderError, StatProvider};
use crate::config::FetchConfig;
use crate::models::{LeetcodeStats, NormalizedStat, SourceId};
use serde::Deserialize;

/// Raw shape of the stats-mirror response.
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    status: String,
    #[serde(rename = "totalSolved")]
    total_solved: Option<u64>,
}

/// Provider for LeetCode solved counts.
pub struct LeetcodeProvider {
    url: String,
}

impl LeetcodeProvider {
    /// Build the provider for a handle against the configured API base.
    pub fn new(config: &FetchConfig, handle: &str) -> Self {
        Self {
            url: format!("{}/{}", config.leetcode_api_url, handle),
        }
    }
}

impl StatProvider for LeetcodeProvider {
    fn id(&self) -> SourceId {
        SourceId::Leetcode
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError> {
        let response: StatsResponse = get_json(client, &self.url).await?;
        normalize(response)
    }
}

/// Require a successful status and a solved count; anything else is a shape
/// mismatch routed to the fallback policy.
fn normalize(response: StatsResponse) -> Result<NormalizedStat, ProviderError> {
    if response.status != "success" {
        return Err(ProviderError::ShapeMismatch(format!(
            "unexpected status {:?}",
            response.status
        )));
    }

    let solved = response.total_solved.ok_or_else(|| {
        ProviderError::ShapeMismatch("totalSolved missing from success response".to_string())
    })?;

    Ok(NormalizedStat::Leetcode(LeetcodeStats { solved }))
}
