//! Value objects shared across the provider adapters, the report
//! orchestrator, and the HTTP API.

use serde::{Deserialize, Serialize};

/// Aggregated organic-search performance for one calendar window.
///
/// `ctr` is always in percentage units (4.96 means 4.96%). `position` is
/// the average result rank (lower is better), and `None` means "no data",
/// which is distinct from a position of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    #[serde(default)]
    pub position: Option<f64>,
}

impl PeriodMetrics {
    /// The all-zero summary used for empty windows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            clicks: 0,
            impressions: 0,
            ctr: 0.0,
            position: None,
        }
    }

    /// Derives CTR in percent from click/impression totals.
    ///
    /// Returns `0.0` when `impressions` is zero, never `NaN`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derive_ctr(clicks: u64, impressions: u64) -> f64 {
        if impressions == 0 {
            0.0
        } else {
            clicks as f64 / impressions as f64 * 100.0
        }
    }
}

/// One month of a trailing series: [`PeriodMetrics`] tagged with its
/// `YYYY-MM` month label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub month: String,
    #[serde(flatten)]
    pub metrics: PeriodMetrics,
}

/// Month-over-month or year-over-year deltas between two period summaries.
///
/// Derived only, never persisted on its own. Percentage deltas are `None`
/// whenever the comparison denominator is zero; renderers must treat that
/// as "comparison unavailable", not as a 0% change. `ctr_delta_pp` is a
/// flat percentage-point subtraction. `position_improvement` is
/// `previous - current`: positive means the rank got numerically smaller,
/// i.e. better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSet {
    pub clicks_delta_abs: i64,
    pub clicks_delta_pct: Option<f64>,
    pub impressions_delta_abs: i64,
    pub impressions_delta_pct: Option<f64>,
    pub ctr_delta_pp: f64,
    pub position_improvement: Option<f64>,
}
