//! Report building and rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report, generate_text_report};

use crate::models::{NormalizedStat, ReportMetadata, SourceId, SourceStatus};
use crate::store::AggregateState;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One source's line in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Which source this entry describes.
    pub id: SourceId,
    /// Terminal (or still pending) status at generation time.
    pub status: SourceStatus,
    /// The normalized record, absent only for pending sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<NormalizedStat>,
}

/// The complete stats report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    /// Report title from configuration.
    pub title: String,
    /// Metadata about the generation run.
    pub metadata: ReportMetadata,
    /// Per-source entries in display order.
    pub sources: Vec<SourceEntry>,
}

impl StatsReport {
    /// Build a report from an aggregate snapshot.
    pub fn from_snapshot(
        snapshot: &AggregateState,
        title: String,
        github_handle: String,
        duration_seconds: f64,
    ) -> Self {
        let sources: Vec<SourceEntry> = SourceId::ALL
            .into_iter()
            .map(|id| {
                let state = &snapshot[&id];
                SourceEntry {
                    id,
                    status: state.status(),
                    stat: state.stat().cloned(),
                }
            })
            .collect();

        let sources_resolved = sources
            .iter()
            .filter(|e| e.status == SourceStatus::Resolved)
            .count();
        let sources_fallback = sources
            .iter()
            .filter(|e| e.status == SourceStatus::Fallback)
            .count();

        Self {
            title,
            metadata: ReportMetadata {
                github_handle,
                generated_at: Utc::now(),
                sources_resolved,
                sources_fallback,
                duration_seconds,
            },
            sources,
        }
    }

    /// Look up one source's entry.
    pub fn entry(&self, id: SourceId) -> Option<&SourceEntry> {
        self.sources.iter().find(|e| e.id == id)
    }

    /// Whether any source is showing its fallback literal.
    pub fn has_fallbacks(&self) -> bool {
        self.metadata.sources_fallback > 0
    }
}
