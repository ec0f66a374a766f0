//! Month-over-month / year-over-year delta computation with explicit
//! null-safety around zero denominators.

use crate::metrics::{DeltaSet, PeriodMetrics};

/// Relative change in percent, or `None` when it cannot be computed.
///
/// `None` is returned whenever `previous` is zero or either operand is
/// non-finite, never `Infinity` or `NaN`. Callers must render `None` as
/// "comparison unavailable", not as 0%.
#[must_use]
pub fn safe_delta_pct(current: f64, previous: f64) -> Option<f64> {
    if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Builds the [`DeltaSet`] between a current summary and an optional
/// comparison summary.
///
/// Returns `None` when there is nothing to compare against. Position
/// improvement is only computed when both sides carry a position; it is
/// never inferred from partial data.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn build_deltas(current: &PeriodMetrics, previous: Option<&PeriodMetrics>) -> Option<DeltaSet> {
    let previous = previous?;

    let position_improvement = match (previous.position, current.position) {
        (Some(prev), Some(cur)) => Some(prev - cur),
        _ => None,
    };

    Some(DeltaSet {
        clicks_delta_abs: current.clicks as i64 - previous.clicks as i64,
        clicks_delta_pct: safe_delta_pct(current.clicks as f64, previous.clicks as f64),
        impressions_delta_abs: current.impressions as i64 - previous.impressions as i64,
        impressions_delta_pct: safe_delta_pct(
            current.impressions as f64,
            previous.impressions as f64,
        ),
        ctr_delta_pp: current.ctr - previous.ctr,
        position_improvement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, MetricRow};

    fn metrics(clicks: u64, impressions: u64, position: Option<f64>) -> PeriodMetrics {
        PeriodMetrics {
            clicks,
            impressions,
            ctr: PeriodMetrics::derive_ctr(clicks, impressions),
            position,
        }
    }

    #[test]
    fn no_comparison_yields_none() {
        assert!(build_deltas(&metrics(10, 100, None), None).is_none());
    }

    #[test]
    fn zero_previous_clicks_yields_null_pct_not_infinity() {
        let deltas = build_deltas(&metrics(50, 1_000, None), Some(&metrics(0, 0, None)))
            .expect("comparison present");
        assert_eq!(deltas.clicks_delta_abs, 50);
        assert!(deltas.clicks_delta_pct.is_none());
        assert!(deltas.impressions_delta_pct.is_none());
    }

    #[test]
    fn position_improvement_requires_both_sides() {
        let with_pos = metrics(1, 10, Some(8.0));
        let without = metrics(1, 10, None);

        let deltas = build_deltas(&with_pos, Some(&without)).unwrap();
        assert!(deltas.position_improvement.is_none());

        let deltas = build_deltas(&without, Some(&with_pos)).unwrap();
        assert!(deltas.position_improvement.is_none());
    }

    #[test]
    fn position_improvement_is_positive_when_rank_gets_better() {
        let current = metrics(1, 10, Some(5.5));
        let previous = metrics(1, 10, Some(9.0));
        let deltas = build_deltas(&current, Some(&previous)).unwrap();
        assert!((deltas.position_improvement.unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn concrete_month_over_month_scenario() {
        // current: 1000 clicks / 20000 impressions; previous: 800 / 25000.
        let current = aggregate(&[MetricRow {
            clicks: 1_000,
            impressions: 20_000,
            position: None,
        }]);
        let previous = aggregate(&[MetricRow {
            clicks: 800,
            impressions: 25_000,
            position: None,
        }]);

        let deltas = build_deltas(&current, Some(&previous)).unwrap();
        assert_eq!(deltas.clicks_delta_abs, 200);
        assert!((deltas.clicks_delta_pct.unwrap() - 25.0).abs() < 1e-9);
        assert!((deltas.ctr_delta_pp - 1.8).abs() < 1e-9);
    }

    #[test]
    fn non_finite_operands_yield_none() {
        assert!(safe_delta_pct(f64::NAN, 10.0).is_none());
        assert!(safe_delta_pct(10.0, f64::INFINITY).is_none());
    }
}
