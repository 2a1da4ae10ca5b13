//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.devstats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::SourceId;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Platform handles.
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// Fetch settings (timeouts, endpoints).
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Platform handles. Platforms left unset reuse the GitHub handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// GitHub username.
    #[serde(default)]
    pub github: String,

    /// LeetCode username.
    #[serde(default)]
    pub leetcode: String,

    /// CodeChef username.
    #[serde(default)]
    pub codechef: String,

    /// Codeforces handle.
    #[serde(default)]
    pub codeforces: String,
}

impl ProfilesConfig {
    /// The effective handle for a source, falling back to the GitHub handle.
    pub fn handle_for(&self, id: SourceId) -> &str {
        let handle = match id {
            SourceId::GithubProfile | SourceId::GithubContributions => &self.github,
            SourceId::Leetcode => &self.leetcode,
            SourceId::Codechef => &self.codechef,
            SourceId::Codeforces => &self.codeforces,
        };

        if handle.is_empty() {
            &self.github
        } else {
            handle
        }
    }
}

/// HTTP fetch settings. Endpoint bases are overridable so tests can point
/// providers at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request. The GitHub API rejects
    /// requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// GitHub REST API base URL.
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Contribution-calendar API base URL.
    #[serde(default = "default_contributions_api_url")]
    pub contributions_api_url: String,

    /// LeetCode stats API base URL.
    #[serde(default = "default_leetcode_api_url")]
    pub leetcode_api_url: String,

    /// CORS relay used to fetch pages that lack cross-origin headers.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// CodeChef profile page base URL (fetched through the relay).
    #[serde(default = "default_codechef_profile_url")]
    pub codechef_profile_url: String,

    /// Codeforces API base URL.
    #[serde(default = "default_codeforces_api_url")]
    pub codeforces_api_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            github_api_url: default_github_api_url(),
            contributions_api_url: default_contributions_api_url(),
            leetcode_api_url: default_leetcode_api_url(),
            relay_url: default_relay_url(),
            codechef_profile_url: default_codechef_profile_url(),
            codeforces_api_url: default_codeforces_api_url(),
        }
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("devstats/{}", env!("CARGO_PKG_VERSION"))
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_contributions_api_url() -> String {
    "https://github-contributions-api.jogruber.de/v4".to_string()
}

fn default_leetcode_api_url() -> String {
    "https://leetcode-stats-api.herokuapp.com".to_string()
}

fn default_relay_url() -> String {
    "https://api.allorigins.win/raw".to_string()
}

fn default_codechef_profile_url() -> String {
    "https://www.codechef.com/users".to_string()
}

fn default_codeforces_api_url() -> String {
    "https://codeforces.com/api".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
        }
    }
}

fn default_output() -> String {
    "devstats_report.md".to_string()
}

fn default_title() -> String {
    "Coding Profile Stats".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".devstats.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref github) = args.github {
            self.profiles.github = github.clone();
        }
        if let Some(ref leetcode) = args.leetcode {
            self.profiles.leetcode = leetcode.clone();
        }
        if let Some(ref codechef) = args.codechef {
            self.profiles.codechef = codechef.clone();
        }
        if let Some(ref codeforces) = args.codeforces {
            self.profiles.codeforces = codeforces.clone();
        }

        if let Some(timeout) = args.timeout {
            self.fetch.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_seconds, 15);
        assert_eq!(config.fetch.github_api_url, "https://api.github.com");
        assert_eq!(config.report.output, "devstats_report.md");
        assert!(config.profiles.github.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[profiles]
github = "octocat"
codeforces = "tourist"

[fetch]
timeout_seconds = 5

[report]
output = "stats.md"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.profiles.github, "octocat");
        assert_eq!(config.profiles.codeforces, "tourist");
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.report.output, "stats.md");
        // Unset fields keep their defaults
        assert_eq!(config.fetch.relay_url, "https://api.allorigins.win/raw");
    }

    #[test]
    fn test_handle_fallback_to_github() {
        let profiles = ProfilesConfig {
            github: "octocat".to_string(),
            leetcode: String::new(),
            codechef: "chef_octocat".to_string(),
            codeforces: String::new(),
        };

        assert_eq!(profiles.handle_for(SourceId::GithubProfile), "octocat");
        assert_eq!(profiles.handle_for(SourceId::Leetcode), "octocat");
        assert_eq!(profiles.handle_for(SourceId::Codechef), "chef_octocat");
        assert_eq!(profiles.handle_for(SourceId::Codeforces), "octocat");
    }

    #[test]
    fn test_load_missing_and_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".devstats.toml");

        assert!(Config::load(&path).is_err());

        std::fs::write(&path, Config::default_toml()).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch.timeout_seconds, 15);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[profiles]"));
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[report]"));
    }
}
