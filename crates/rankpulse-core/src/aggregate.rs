//! Reduction of dated provider rows into a single period summary.

use crate::metrics::PeriodMetrics;

/// A single dated row as delivered by a provider adapter, already
/// normalized to canonical units (CTR conversion happens in the adapters;
/// the aggregator re-derives CTR from totals and ignores row-level CTR).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub clicks: u64,
    pub impressions: u64,
    pub position: Option<f64>,
}

/// Reduces a list of rows into one [`PeriodMetrics`].
///
/// Clicks and impressions are summed; CTR is derived from the totals
/// (`0` when total impressions are zero). Position is the arithmetic mean
/// of the rows that carry one, not impression-weighted; both providers
/// are averaged with the same policy so the report never mixes weightings.
/// An empty input produces the all-zero summary with `position: None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(rows: &[MetricRow]) -> PeriodMetrics {
    let mut clicks = 0u64;
    let mut impressions = 0u64;
    let mut position_sum = 0.0f64;
    let mut position_count = 0usize;

    for row in rows {
        clicks += row.clicks;
        impressions += row.impressions;
        if let Some(p) = row.position {
            position_sum += p;
            position_count += 1;
        }
    }

    let position = if position_count > 0 {
        Some(position_sum / position_count as f64)
    } else {
        None
    };

    PeriodMetrics {
        clicks,
        impressions,
        ctr: PeriodMetrics::derive_ctr(clicks, impressions),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let summary = aggregate(&[]);
        assert_eq!(summary.clicks, 0);
        assert_eq!(summary.impressions, 0);
        assert!((summary.ctr - 0.0).abs() < f64::EPSILON);
        assert!(summary.position.is_none());
    }

    #[test]
    fn sums_clicks_and_impressions_and_derives_ctr() {
        let rows = vec![
            MetricRow {
                clicks: 600,
                impressions: 12_000,
                position: Some(10.0),
            },
            MetricRow {
                clicks: 400,
                impressions: 8_000,
                position: Some(20.0),
            },
        ];
        let summary = aggregate(&rows);
        assert_eq!(summary.clicks, 1_000);
        assert_eq!(summary.impressions, 20_000);
        assert!((summary.ctr - 5.0).abs() < 1e-9);
        assert!((summary.position.unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn zero_impressions_yields_zero_ctr_not_nan() {
        let rows = vec![MetricRow {
            clicks: 0,
            impressions: 0,
            position: None,
        }];
        let summary = aggregate(&rows);
        assert!((summary.ctr - 0.0).abs() < f64::EPSILON);
        assert!(summary.ctr.is_finite());
    }

    #[test]
    fn position_ignores_rows_without_one() {
        let rows = vec![
            MetricRow {
                clicks: 1,
                impressions: 10,
                position: Some(4.0),
            },
            MetricRow {
                clicks: 2,
                impressions: 20,
                position: None,
            },
        ];
        let summary = aggregate(&rows);
        assert!((summary.position.unwrap() - 4.0).abs() < f64::EPSILON);
    }
}
