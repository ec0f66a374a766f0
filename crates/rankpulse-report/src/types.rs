//! Assembled report payloads.

use rankpulse_ai::{NarrativeOutcome, NarrativeRequest};
use rankpulse_core::PeriodMetrics;
use serde::Serialize;

/// One day of the merged daily series for the report month. Days where a
/// provider has no row are zero-filled rather than omitted, so the series
/// always covers the whole calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub google: PeriodMetrics,
    pub bing: PeriodMetrics,
}

/// A fully computed report, before persistence.
///
/// `summary` is the same numeric pack handed to the narrative
/// collaborator; it is persisted verbatim as the report summary.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedReport {
    pub site: String,
    pub period: String,
    pub summary: NarrativeRequest,
    pub narrative: NarrativeOutcome,
    pub daily: Vec<DailyEntry>,
}

/// A computed report plus the outcome of the upsert. `persisted` is
/// `false` when the write failed; the report is still returned.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    #[serde(flatten)]
    pub report: ComputedReport,
    pub persisted: bool,
}
