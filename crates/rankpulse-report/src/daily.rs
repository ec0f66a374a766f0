//! Merged per-day series for the report month.

use rankpulse_bing::DailyStat;
use rankpulse_core::{PeriodMetrics, ReportPeriod};
use rankpulse_gsc::PerformanceRow;

use crate::types::DailyEntry;

/// Builds one entry per calendar day of `period`, joining the Google
/// date-dimension rows and the Bing daily stats on the `YYYY-MM-DD` key.
/// Missing days are zero-filled on either side.
#[must_use]
pub fn build_daily_series(
    period: ReportPeriod,
    google_rows: &[PerformanceRow],
    bing_stats: &[DailyStat],
) -> Vec<DailyEntry> {
    period
        .days()
        .into_iter()
        .map(|day| {
            let key = day.format("%Y-%m-%d").to_string();

            let google = google_rows
                .iter()
                .find(|row| row.key == key)
                .map_or_else(PeriodMetrics::empty, |row| PeriodMetrics {
                    clicks: row.clicks,
                    impressions: row.impressions,
                    ctr: row.ctr,
                    position: row.position,
                });

            let bing = bing_stats
                .iter()
                .find(|stat| stat.date == day)
                .map_or_else(PeriodMetrics::empty, |stat| PeriodMetrics {
                    clicks: stat.clicks,
                    impressions: stat.impressions,
                    ctr: PeriodMetrics::derive_ctr(stat.clicks, stat.impressions),
                    position: None,
                });

            DailyEntry {
                date: key,
                google,
                bing,
            }
        })
        .collect()
}
