//! The report orchestrator: window fetches, delta computation, series
//! assembly, narrative call, persistence.

use std::collections::BTreeMap;

use futures::join;
use rankpulse_ai::{DeltaPair, NarrativeOutcome, NarrativeRequest, QueryStat, SourceSection};
use rankpulse_bing::{fetch_stats_with_probe, DailyStat};
use rankpulse_core::{
    aggregate, build_deltas, build_month_series, MetricRow, MonthPoint, PeriodMetrics,
    ReportPeriod, SiteMatches, SERIES_CAP,
};
use rankpulse_gsc::{Dimension, PerformanceRow};
use sqlx::PgPool;

use crate::daily::build_daily_series;
use crate::error::ReportError;
use crate::providers::Providers;
use crate::sites::site_inventories;
use crate::types::{ComputedReport, GeneratedReport};

/// Computes a report for `(site_key, period)` without touching storage.
///
/// The Google windows (current, previous, YoY, top queries, trailing
/// months) and the single Bing stats fetch are independent, so they are
/// dispatched together and joined once all have settled. Any one of them
/// failing is downgraded to "no data for this window"; a partial report
/// is still produced, and a failed current window carries no deltas at
/// all. Only identifier resolution and an unconfigured provider abort
/// the request.
///
/// # Errors
///
/// - [`ReportError::SiteNotFound`] when the key is missing from either
///   provider's inventory.
/// - [`ReportError::ProviderNotConfigured`] without a Bing client.
/// - [`ReportError::Gsc`] / [`ReportError::Bing`] when an inventory
///   fetch fails.
pub async fn build_report(
    providers: &Providers,
    site_key: &str,
    period: ReportPeriod,
) -> Result<ComputedReport, ReportError> {
    let bing_client = providers.require_bing()?;

    let matches = site_inventories(providers).await?;
    let Some(matched) = matches.find(site_key) else {
        return Err(site_not_found(&matches, site_key));
    };

    let previous = period.prev();
    let yoy = period.year_ago();
    #[allow(clippy::cast_possible_truncation)]
    let series_start = period.months_back(SERIES_CAP as u32 - 1);

    let gsc_site = matched.primary_url.as_str();
    let (current_rows, previous_rows, yoy_rows, query_rows, series_rows, bing_stats) = join!(
        providers
            .gsc
            .query(gsc_site, period.first_day(), period.last_day(), Dimension::Date),
        providers.gsc.query(
            gsc_site,
            previous.first_day(),
            previous.last_day(),
            Dimension::Date
        ),
        providers
            .gsc
            .query(gsc_site, yoy.first_day(), yoy.last_day(), Dimension::Date),
        providers.gsc.query(
            gsc_site,
            period.first_day(),
            period.last_day(),
            Dimension::Query
        ),
        providers.gsc.query(
            gsc_site,
            series_start.first_day(),
            period.last_day(),
            Dimension::Month
        ),
        fetch_stats_with_probe(bing_client, &matched.secondary_url),
    );

    let current_rows = downgrade(site_key, "google current", current_rows);
    let previous_rows = downgrade(site_key, "google previous", previous_rows);
    let yoy_rows = downgrade(site_key, "google yoy", yoy_rows);
    let query_rows = downgrade(site_key, "google top queries", query_rows);
    let series_rows = downgrade(site_key, "google trailing series", series_rows);
    let bing_stats = downgrade(site_key, "bing stats", bing_stats);

    let google = google_section(
        current_rows.as_deref(),
        previous_rows.as_deref(),
        yoy_rows.as_deref(),
        query_rows.unwrap_or_default(),
        series_rows.unwrap_or_default(),
    );
    let bing = bing_stats
        .as_deref()
        .map(|stats| bing_section(stats, period, previous, yoy));

    let summary = NarrativeRequest {
        site: site_key.to_owned(),
        month: period.label(),
        google,
        bing,
    };

    let daily = build_daily_series(
        period,
        current_rows.as_deref().unwrap_or_default(),
        bing_stats.as_deref().unwrap_or_default(),
    );

    let narrative = narrate(providers, &summary).await;

    Ok(ComputedReport {
        site: site_key.to_owned(),
        period: period.label(),
        summary,
        narrative,
        daily,
    })
}

/// Computes a report and upserts it under `(site_key, period)`.
///
/// A failed write is logged and reflected in `persisted: false`; the
/// freshly computed report is returned either way.
///
/// # Errors
///
/// Same as [`build_report`]; persistence failures are not errors here.
pub async fn generate_report(
    pool: &PgPool,
    providers: &Providers,
    site_key: &str,
    period: ReportPeriod,
) -> Result<GeneratedReport, ReportError> {
    let report = build_report(providers, site_key, period).await?;

    let persisted = match persist(pool, &report).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                site = site_key,
                period = %report.period,
                error = %e,
                "failed to persist report; returning it unsaved"
            );
            false
        }
    };

    Ok(GeneratedReport { report, persisted })
}

async fn persist(pool: &PgPool, report: &ComputedReport) -> anyhow::Result<()> {
    let summary = serde_json::to_value(&report.summary)?;
    let narrative = serde_json::to_value(&report.narrative)?;
    let daily = serde_json::to_value(&report.daily)?;
    rankpulse_db::upsert_report(
        pool,
        &report.site,
        &report.period,
        &summary,
        &narrative,
        &daily,
    )
    .await?;
    Ok(())
}

/// Catch-log-and-continue at the smallest scope: one window's failure
/// becomes `None` and never aborts its siblings.
fn downgrade<T, E: std::fmt::Display>(site: &str, window: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(site, window, error = %e, "window fetch failed; continuing without it");
            None
        }
    }
}

/// How many search terms the report keeps from the query-dimension rows.
const TOP_QUERY_LIMIT: usize = 10;

fn google_section(
    current: Option<&[PerformanceRow]>,
    previous: Option<&[PerformanceRow]>,
    yoy: Option<&[PerformanceRow]>,
    mut query_rows: Vec<PerformanceRow>,
    series_rows: Vec<PerformanceRow>,
) -> SourceSection {
    let current = current.map(aggregate_google);
    let previous = previous.map(aggregate_google);
    let yoy = yoy.map(aggregate_google);

    // No current window, no comparisons: a failed fetch stays `None`
    // instead of masquerading as an all-zero month.
    let deltas = current
        .as_ref()
        .map_or_else(DeltaPair::default, |cur| DeltaPair {
            mom: build_deltas(cur, previous.as_ref()),
            yoy: build_deltas(cur, yoy.as_ref()),
        });

    query_rows.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    let top_queries = query_rows
        .into_iter()
        .take(TOP_QUERY_LIMIT)
        .map(|row| QueryStat {
            query: row.key,
            metrics: PeriodMetrics {
                clicks: row.clicks,
                impressions: row.impressions,
                ctr: row.ctr,
                position: row.position,
            },
        })
        .collect();

    let last_16_months = build_month_series(
        series_rows
            .into_iter()
            .map(|row| MonthPoint {
                month: row.key.clone(),
                metrics: PeriodMetrics {
                    clicks: row.clicks,
                    impressions: row.impressions,
                    ctr: row.ctr,
                    position: row.position,
                },
            })
            .collect(),
    );

    SourceSection {
        current,
        previous,
        yoy,
        deltas,
        top_queries,
        last_16_months,
    }
}

fn bing_section(
    stats: &[DailyStat],
    period: ReportPeriod,
    previous: ReportPeriod,
    yoy: ReportPeriod,
) -> SourceSection {
    let current = aggregate_bing(stats, period);
    let previous = Some(aggregate_bing(stats, previous));
    let yoy = Some(aggregate_bing(stats, yoy));

    let deltas = DeltaPair {
        mom: build_deltas(&current, previous.as_ref()),
        yoy: build_deltas(&current, yoy.as_ref()),
    };

    SourceSection {
        current: Some(current),
        previous,
        yoy,
        deltas,
        top_queries: Vec::new(),
        last_16_months: build_month_series(bing_month_points(stats)),
    }
}

fn aggregate_google(rows: &[PerformanceRow]) -> PeriodMetrics {
    let rows: Vec<MetricRow> = rows
        .iter()
        .map(|row| MetricRow {
            clicks: row.clicks,
            impressions: row.impressions,
            position: row.position,
        })
        .collect();
    aggregate(&rows)
}

/// Slices the all-time Bing stats down to one calendar month and
/// aggregates the slice. Bing's stats endpoint does not expose position,
/// so the summary never carries one.
fn aggregate_bing(stats: &[DailyStat], period: ReportPeriod) -> PeriodMetrics {
    let rows: Vec<MetricRow> = stats
        .iter()
        .filter(|stat| period.contains(stat.date))
        .map(|stat| MetricRow {
            clicks: stat.clicks,
            impressions: stat.impressions,
            position: None,
        })
        .collect();
    aggregate(&rows)
}

/// Folds daily Bing stats into per-month points for the trailing series.
fn bing_month_points(stats: &[DailyStat]) -> Vec<MonthPoint> {
    let mut by_month: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for stat in stats {
        let label = stat.date.format("%Y-%m").to_string();
        let entry = by_month.entry(label).or_insert((0, 0));
        entry.0 += stat.clicks;
        entry.1 += stat.impressions;
    }

    by_month
        .into_iter()
        .map(|(month, (clicks, impressions))| MonthPoint {
            month,
            metrics: PeriodMetrics {
                clicks,
                impressions,
                ctr: PeriodMetrics::derive_ctr(clicks, impressions),
                position: None,
            },
        })
        .collect()
}

/// Calls the narrative collaborator; any failure degrades to a raw-text
/// placeholder so the numeric report always survives.
async fn narrate(providers: &Providers, summary: &NarrativeRequest) -> NarrativeOutcome {
    match providers.narrative.as_ref() {
        Some(client) => match client.generate(summary).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(site = %summary.site, error = %e, "narrative generation failed");
                NarrativeOutcome::Raw {
                    text: "Narrative generation is currently unavailable.".to_owned(),
                }
            }
        },
        None => NarrativeOutcome::Raw {
            text: "Narrative generation is not configured.".to_owned(),
        },
    }
}

fn site_not_found(matches: &SiteMatches, site_key: &str) -> ReportError {
    let in_google = matches.primary_only.iter().any(|s| s.key == site_key);
    let in_bing = matches.secondary_only.iter().any(|s| s.key == site_key);
    let provider = match (in_google, in_bing) {
        (true, false) => "bing webmaster",
        (false, true) => "google search console",
        _ => "google search console and bing webmaster",
    };
    ReportError::SiteNotFound {
        key: site_key.to_owned(),
        provider: provider.to_owned(),
    }
}
