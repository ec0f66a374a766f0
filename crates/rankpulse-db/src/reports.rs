//! Database operations for the `reports` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `reports` table. The three JSON columns are
/// schema-on-read: summary is the numeric pack, narrative is the (opaque)
/// text-generation payload, daily is the merged per-day series.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub site_id: String,
    pub period: String,
    pub summary: Value,
    pub narrative: Value,
    pub daily: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert one report keyed by `(site_id, period)` and return its id.
///
/// Regenerating a report for the same site and month overwrites the
/// previous row; concurrent regenerations race safely with last-write-wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the write fails.
pub async fn upsert_report(
    pool: &PgPool,
    site_id: &str,
    period: &str,
    summary: &Value,
    narrative: &Value,
    daily: &Value,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO reports (site_id, period, summary, narrative, daily) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (site_id, period) DO UPDATE SET \
             summary    = EXCLUDED.summary, \
             narrative  = EXCLUDED.narrative, \
             daily      = EXCLUDED.daily, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(site_id)
    .bind(period)
    .bind(summary)
    .bind(narrative)
    .bind(daily)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List a site's report history, newest period first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reports_for_site(
    pool: &PgPool,
    site_id: &str,
    limit: i64,
) -> Result<Vec<ReportRow>, DbError> {
    let rows = sqlx::query_as::<_, ReportRow>(
        "SELECT id, site_id, period, summary, narrative, daily, created_at, updated_at \
         FROM reports \
         WHERE site_id = $1 \
         ORDER BY period DESC \
         LIMIT $2",
    )
    .bind(site_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one report by its key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] when no row exists for the key, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_report(pool: &PgPool, site_id: &str, period: &str) -> Result<ReportRow, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(
        "SELECT id, site_id, period, summary, narrative, daily, created_at, updated_at \
         FROM reports \
         WHERE site_id = $1 AND period = $2",
    )
    .bind(site_id)
    .bind(period)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}
