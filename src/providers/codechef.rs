//! CodeChef provider.
//!
//! CodeChef has no public stats API, so this provider scrapes the profile
//! page through a CORS relay and extracts the rating from the embedded
//! page data. The page inlines the full rating history as JSON, so the
//! last `"rating":"<digits>"` occurrence is the most recent value.

use super::{get_text, ProviderError, StatProvider};
use crate::config::FetchConfig;
use crate::models::{CodechefStats, NormalizedStat, SourceId};
use regex::Regex;
use std::sync::OnceLock;

fn rating_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""rating":"(\d+)""#).expect("valid rating pattern"))
}

/// Provider for CodeChef ratings via profile-page scrape.
pub struct CodechefProvider {
    relay_url: String,
    profile_url: String,
}

impl CodechefProvider {
    /// Build the provider for a handle against the configured relay and
    /// profile base.
    pub fn new(config: &FetchConfig, handle: &str) -> Self {
        Self {
            relay_url: config.relay_url.clone(),
            profile_url: format!("{}/{}", config.codechef_profile_url, handle),
        }
    }

    /// The relay URL with the profile URL percent-encoded into the query.
    fn request_url(&self) -> Result<String, ProviderError> {
        reqwest::Url::parse_with_params(&self.relay_url, [("url", self.profile_url.as_str())])
            .map(String::from)
            .map_err(|e| ProviderError::Network(format!("invalid relay URL: {}", e)))
    }
}

impl StatProvider for CodechefProvider {
    fn id(&self) -> SourceId {
        SourceId::Codechef
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<NormalizedStat, ProviderError> {
        let url = self.request_url()?;
        let body = get_text(client, &url).await?;
        normalize(&body)
    }
}

/// Extract the most recent rating from the page body and derive the star
/// tier. No match means the page layout changed (or the relay returned an
/// error page) and is a shape mismatch.
fn normalize(body: &str) -> Result<NormalizedStat, ProviderError> {
    let rating = rating_pattern()
        .captures_iter(body)
        .last()
        .and_then(|capture| capture[1].parse::<u64>().ok())
        .ok_or_else(|| {
            ProviderError::ShapeMismatch("no rating found in profile page".to_string())
        })?;

    Ok(NormalizedStat::Codechef(CodechefStats::from_rating(rating)))
}
