//! Trailing month-series assembly: dedup, sort, cap.

use std::collections::BTreeMap;

use crate::metrics::MonthPoint;
use crate::period::ReportPeriod;

/// Maximum number of months kept in a trailing series.
pub const SERIES_CAP: usize = 16;

/// Builds the trailing series from raw month points.
///
/// Points with an unparseable month label are dropped. Duplicate months
/// collapse to one entry (the last occurrence wins, so fresher data
/// overrides earlier rows). The result is sorted ascending by month and
/// truncated to the most recent [`SERIES_CAP`] entries.
#[must_use]
pub fn build_month_series(points: Vec<MonthPoint>) -> Vec<MonthPoint> {
    let mut by_month: BTreeMap<String, MonthPoint> = BTreeMap::new();
    for point in points {
        if ReportPeriod::parse(&point.month).is_none() {
            continue;
        }
        by_month.insert(point.month.clone(), point);
    }

    let mut series: Vec<MonthPoint> = by_month.into_values().collect();
    if series.len() > SERIES_CAP {
        series.drain(..series.len() - SERIES_CAP);
    }
    series
}
