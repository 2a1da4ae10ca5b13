//! GitHub contribution-calendar provider.
//!
//! Resolves the `github_contributions` source from a third-party calendar
//! API that exposes per-year contribution totals.

use super::{get_json, ProviderError, StatProvider};
use crate::config::FetchConfig;
use crate::models::{ContributionStats, NormalizedStat, SourceId};
use serde::Deserialize;
use std::collections::HashMap;

/// Raw shape of the calendar response. Only the `total` year→count mapping
/// is used; an absent mapping sums to 0.
#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    total: HashMap<String, u64>,
}

/// Provider for the contribution calendar.
pub struct ContributionsProvider {
    url: String,
}

impl ContributionsProvider {
    /// Build the provider for a handle against the configured API base.
    pub fn new(config: &FetchConfig, handle: &str) -> Self {
        Self {
            url: format!("{}/{}", config.contributions_api_url, handle),
        }
    }
}

impl StatProvider for ContributionsProvider {
    fn id(&self) -> SourceId {
        SourceId::GithubContributions
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError> {
        let calendar: CalendarResponse = get_json(client, &self.url).await?;

        Ok(NormalizedStat::GithubContributions(ContributionStats {
            contributions: sum_years(&calendar),
        }))
    }
}

/// Sum all yearly totals into one contribution count.
fn sum_years(calendar: &CalendarResponse) -> u64 {
    calendar.total.values().sum()
}
