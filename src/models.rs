//! Data models for the stats aggregator.
//!
//! This module contains the core data structures used throughout the
//! application: source identifiers, normalized per-source records, and
//! the per-source lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one external stat source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// GitHub user profile plus repository list (repos, followers, stars).
    GithubProfile,
    /// GitHub contribution calendar (yearly totals).
    GithubContributions,
    /// LeetCode solved-problem count (JSON stats mirror).
    Leetcode,
    /// CodeChef rating, scraped from the public profile page.
    Codechef,
    /// Codeforces rating and rank (official JSON API).
    Codeforces,
}

impl SourceId {
    /// All known sources, in report order.
    pub const ALL: [SourceId; 5] = [
        SourceId::GithubProfile,
        SourceId::GithubContributions,
        SourceId::Leetcode,
        SourceId::Codechef,
        SourceId::Codeforces,
    ];

    /// Human-readable source name for reports and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::GithubProfile => "GitHub",
            SourceId::GithubContributions => "GitHub Contributions",
            SourceId::Leetcode => "LeetCode",
            SourceId::Codechef => "CodeChef",
            SourceId::Codeforces => "Codeforces",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// GitHub profile stats (user endpoint plus repo list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubStats {
    /// Number of public repositories.
    pub repos: u64,
    /// Number of followers.
    pub followers: u64,
    /// Total stars across all public repositories.
    pub stars: u64,
}

/// GitHub contribution-calendar stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionStats {
    /// Total contributions summed across all years.
    pub contributions: u64,
}

/// LeetCode stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeetcodeStats {
    /// Total problems solved.
    pub solved: u64,
}

/// CodeChef stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodechefStats {
    /// Current contest rating.
    pub rating: u64,
    /// Star tier derived from the rating (1 through 5).
    pub stars: u8,
}

impl CodechefStats {
    /// Derive the star tier from a rating using CodeChef's public bands.
    pub fn tier_for_rating(rating: u64) -> u8 {
        if rating >= 2000 {
            5
        } else if rating >= 1800 {
            4
        } else if rating >= 1600 {
            3
        } else if rating >= 1400 {
            2
        } else {
            1
        }
    }

    /// Build stats from a rating, deriving the tier.
    pub fn from_rating(rating: u64) -> Self {
        Self {
            rating,
            stars: Self::tier_for_rating(rating),
        }
    }

    /// Star tier rendered as a "★★★"-style string.
    pub fn star_string(&self) -> String {
        "★".repeat(self.stars as usize)
    }
}

/// Codeforces stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeforcesStats {
    /// Current contest rating.
    pub rating: u64,
    /// Rank title (e.g. "specialist"); "Unrated" when absent upstream.
    pub rank: String,
}

/// A fixed-shape record normalized from one source's raw response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum NormalizedStat {
    GithubProfile(GithubStats),
    GithubContributions(ContributionStats),
    Leetcode(LeetcodeStats),
    Codechef(CodechefStats),
    Codeforces(CodeforcesStats),
}

impl NormalizedStat {
    /// The source this record belongs to.
    pub fn source_id(&self) -> SourceId {
        match self {
            NormalizedStat::GithubProfile(_) => SourceId::GithubProfile,
            NormalizedStat::GithubContributions(_) => SourceId::GithubContributions,
            NormalizedStat::Leetcode(_) => SourceId::Leetcode,
            NormalizedStat::Codechef(_) => SourceId::Codechef,
            NormalizedStat::Codeforces(_) => SourceId::Codeforces,
        }
    }

    /// One-line rendering used in text reports and log output.
    pub fn summary(&self) -> String {
        match self {
            NormalizedStat::GithubProfile(s) => format!(
                "{} repos, {} followers, {} stars",
                s.repos, s.followers, s.stars
            ),
            NormalizedStat::GithubContributions(s) => {
                format!("{} contributions", s.contributions)
            }
            NormalizedStat::Leetcode(s) => format!("{} problems solved", s.solved),
            NormalizedStat::Codechef(s) => {
                format!("{} ({} rating)", s.star_string(), s.rating)
            }
            NormalizedStat::Codeforces(s) => {
                format!("{} ({})", capitalize_first(&s.rank), s.rating)
            }
        }
    }
}

/// Capitalize the first character of a rank title for display.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Terminal-or-pending status of one source in the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Fetch not yet settled.
    Pending,
    /// Live data was fetched and normalized.
    Resolved,
    /// Live data was unavailable; the fallback literal is in effect.
    Fallback,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Pending => write!(f, "pending"),
            SourceStatus::Resolved => write!(f, "resolved"),
            SourceStatus::Fallback => write!(f, "fallback"),
        }
    }
}

/// The state of one source: a pending placeholder or an atomic record.
///
/// A record is only ever observed whole; there is no partially-filled
/// intermediate shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stat", rename_all = "lowercase")]
pub enum SourceState {
    Pending,
    Resolved(NormalizedStat),
    Fallback(NormalizedStat),
}

impl SourceState {
    /// The status discriminant of this state.
    pub fn status(&self) -> SourceStatus {
        match self {
            SourceState::Pending => SourceStatus::Pending,
            SourceState::Resolved(_) => SourceStatus::Resolved,
            SourceState::Fallback(_) => SourceStatus::Fallback,
        }
    }

    /// Whether this state is terminal (resolved or fallback).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SourceState::Pending)
    }

    /// The normalized record, if the source has settled.
    pub fn stat(&self) -> Option<&NormalizedStat> {
        match self {
            SourceState::Pending => None,
            SourceState::Resolved(stat) | SourceState::Fallback(stat) => Some(stat),
        }
    }
}

/// Metadata about a generated stats report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// GitHub handle the report was generated for.
    pub github_handle: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of sources that resolved with live data.
    pub sources_resolved: usize,
    /// Number of sources that fell back to their literal.
    pub sources_fallback: usize,
    /// Wall-clock duration of the fetch phase in seconds.
    pub duration_seconds: f64,
}
