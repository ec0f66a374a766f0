//! Report generation and history endpoints.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rankpulse_core::ReportPeriod;
use serde::{Deserialize, Serialize};

use super::{
    map_db_error, map_report_error, normalize_limit, require_providers, ApiError, ApiResponse,
    ResponseMeta,
};
use crate::api::AppState;
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct GenerateBody {
    site: String,
    year: i32,
    month: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    site: String,
    limit: Option<i64>,
}

/// One persisted report in the history listing.
#[derive(Debug, Serialize)]
pub(super) struct HistoryItem {
    pub id: i64,
    pub site: String,
    pub period: String,
    pub summary: serde_json::Value,
    pub narrative: serde_json::Value,
    pub daily: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(super) async fn generate_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateBody>,
) -> impl IntoResponse {
    let Some(period) = ReportPeriod::new(body.year, body.month) else {
        return ApiError::new(
            req_id.0,
            "validation_error",
            format!("{}-{} is not a valid calendar month", body.year, body.month),
        )
        .into_response();
    };
    let providers = match require_providers(&state, &req_id.0) {
        Ok(p) => p,
        Err(e) => return e.into_response(),
    };

    match rankpulse_report::generate_report(&state.pool, &providers, &body.site, period).await {
        Ok(report) => Json(ApiResponse {
            data: report,
            meta: ResponseMeta::new(req_id.0),
        })
        .into_response(),
        Err(e) => map_report_error(req_id.0, &e).into_response(),
    }
}

pub(super) async fn report_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = normalize_limit(query.limit);

    match rankpulse_db::list_reports_for_site(&state.pool, &query.site, limit).await {
        Ok(rows) => {
            let data: Vec<HistoryItem> = rows
                .into_iter()
                .map(|row| HistoryItem {
                    id: row.id,
                    site: row.site_id,
                    period: row.period,
                    summary: row.summary,
                    narrative: row.narrative,
                    daily: row.daily,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                })
                .collect();
            Json(ApiResponse {
                data,
                meta: ResponseMeta::new(req_id.0),
            })
            .into_response()
        }
        Err(e) => map_db_error(req_id.0, &e).into_response(),
    }
}
