//! Fallback policy.
//!
//! When a source cannot be resolved (network failure, bad status, parse
//! error, shape mismatch), its entry is filled with a fixed last-known-good
//! literal instead of surfacing an error. The literals are shape-identical
//! to live records and can never fail themselves; one miss is permanent for
//! the rest of the run.

use crate::models::{
    CodechefStats, CodeforcesStats, ContributionStats, GithubStats, LeetcodeStats,
    NormalizedStat, SourceId,
};

/// The fallback literal for a source.
pub fn fallback_stat(id: SourceId) -> NormalizedStat {
    match id {
        SourceId::GithubProfile => NormalizedStat::GithubProfile(GithubStats {
            repos: 42,
            followers: 0,
            stars: 156,
        }),
        SourceId::GithubContributions => {
            NormalizedStat::GithubContributions(ContributionStats { contributions: 487 })
        }
        SourceId::Leetcode => NormalizedStat::Leetcode(LeetcodeStats { solved: 500 }),
        SourceId::Codechef => NormalizedStat::Codechef(CodechefStats {
            rating: 1278,
            stars: 1,
        }),
        SourceId::Codeforces => NormalizedStat::Codeforces(CodeforcesStats {
            rating: 1400,
            rank: "Specialist".to_string(),
        }),
    }
}
