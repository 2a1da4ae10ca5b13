//! Markdown, JSON and text report generation.

use super::{SourceEntry, StatsReport};
use crate::models::{capitalize_first, NormalizedStat, SourceId, SourceStatus};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &StatsReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.title));

    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_github_section(report));
    output.push_str(&generate_platforms_section(report));
    output.push_str(&generate_footer(report));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &StatsReport) -> String {
    let mut section = String::new();
    let metadata = &report.metadata;

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **GitHub Handle:** {}\n", metadata.github_handle));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Sources:** {} live, {} cached\n",
        metadata.sources_resolved, metadata.sources_fallback
    ));
    section.push_str(&format!(
        "- **Fetch Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the GitHub activity table.
fn generate_github_section(report: &StatsReport) -> String {
    let mut section = String::new();

    section.push_str("## GitHub Activity\n\n");

    let profile = report
        .entry(SourceId::GithubProfile)
        .and_then(|e| match &e.stat {
            Some(NormalizedStat::GithubProfile(s)) => Some(*s),
            _ => None,
        });
    let contributions =
        report
            .entry(SourceId::GithubContributions)
            .and_then(|e| match &e.stat {
                Some(NormalizedStat::GithubContributions(s)) => Some(*s),
                _ => None,
            });

    section.push_str("| 📦 Repositories | 👥 Followers | ⭐ Stars Earned | 🔥 Contributions |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        profile.map_or_else(|| "-".to_string(), |s| s.repos.to_string()),
        profile.map_or_else(|| "-".to_string(), |s| s.followers.to_string()),
        profile.map_or_else(|| "-".to_string(), |s| s.stars.to_string()),
        contributions.map_or_else(|| "-".to_string(), |s| s.contributions.to_string()),
    ));

    section
}

/// Generate the competitive-programming platforms table.
fn generate_platforms_section(report: &StatsReport) -> String {
    let mut section = String::new();

    section.push_str("## Competitive Programming\n\n");
    section.push_str("| Platform | Stats | Status |\n");
    section.push_str("|:---|:---|:---:|\n");

    for id in [SourceId::Leetcode, SourceId::Codechef, SourceId::Codeforces] {
        if let Some(entry) = report.entry(id) {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                id.display_name(),
                platform_stats_line(entry),
                status_marker(entry.status),
            ));
        }
    }
    section.push('\n');

    if report.has_fallbacks() {
        section.push_str(
            "\\* cached: live data was unavailable; showing the last-known snapshot.\n\n",
        );
    }

    section
}

/// Render one platform's stats the way the profile badges do.
fn platform_stats_line(entry: &SourceEntry) -> String {
    match &entry.stat {
        Some(NormalizedStat::Leetcode(s)) => format!("{}+ Problems Solved", s.solved),
        Some(NormalizedStat::Codechef(s)) => {
            format!("{} ({}+ Rating)", s.star_string(), s.rating)
        }
        Some(NormalizedStat::Codeforces(s)) => {
            format!("{} ({})", capitalize_first(&s.rank), s.rating)
        }
        Some(other) => other.summary(),
        None => "Loading...".to_string(),
    }
}

/// Status marker for a table cell.
fn status_marker(status: SourceStatus) -> &'static str {
    match status {
        SourceStatus::Pending => "pending",
        SourceStatus::Resolved => "live",
        SourceStatus::Fallback => "cached\\*",
    }
}

/// Generate the report footer.
fn generate_footer(report: &StatsReport) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by devstats v{} on {}*\n",
        env!("CARGO_PKG_VERSION"),
        report.metadata.generated_at.format("%Y-%m-%d")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &StatsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a compact text report for terminal output.
pub fn generate_text_report(report: &StatsReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "📊 {} — {}",
        report.title, report.metadata.github_handle
    ));

    for entry in &report.sources {
        let value = entry
            .stat
            .as_ref()
            .map_or_else(|| "pending".to_string(), NormalizedStat::summary);
        let marker = if entry.status == SourceStatus::Fallback {
            " (cached)"
        } else {
            ""
        };
        lines.push(format!(
            "   {:<22} {}{}",
            format!("{}:", entry.id.display_name()),
            value,
            marker
        ));
    }

    if report.has_fallbacks() {
        lines.push(format!(
            "   {} of {} sources are showing cached snapshots",
            report.metadata.sources_fallback,
            report.sources.len()
        ));
    }

    lines.join("\n")
}
