mod reports;
mod sites;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use rankpulse_report::{Providers, ReportError};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_budget, request_id, require_bearer_auth, BearerAuth, RateBudget, RequestId,
};

/// Shared handler state. `providers` is absent when no Google credential
/// is configured; provider-backed endpoints answer 503 in that case while
/// history and health keep working.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub providers: Option<Arc<Providers>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "provider_not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(24).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &rankpulse_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_report_error(request_id: String, error: &ReportError) -> ApiError {
    match error {
        ReportError::SiteNotFound { .. } => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        ReportError::ProviderNotConfigured { .. } => {
            ApiError::new(request_id, "provider_not_configured", error.to_string())
        }
        ReportError::Gsc(_) | ReportError::Bing(_) => {
            tracing::error!(error = %error, "provider request failed");
            ApiError::new(request_id, "upstream_error", "provider request failed")
        }
    }
}

/// Resolves the provider bundle or answers with the configuration error.
pub(super) fn require_providers(
    state: &AppState,
    request_id: &str,
) -> Result<Arc<Providers>, ApiError> {
    state.providers.clone().ok_or_else(|| {
        ApiError::new(
            request_id.to_owned(),
            "provider_not_configured",
            "google search console is not configured",
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Request budgets per route class. Generation hits both provider APIs
/// and the model on every call; reads stay within Postgres or one
/// listing request.
#[derive(Clone)]
pub struct RateLimits {
    pub reads: RateBudget,
    pub generate: RateBudget,
}

#[must_use]
pub fn default_rate_limits() -> RateLimits {
    RateLimits {
        reads: RateBudget::new("read", 120, Duration::from_secs(60)),
        generate: RateBudget::new("report generation", 10, Duration::from_secs(60)),
    }
}

fn protected_router(auth: BearerAuth, limits: RateLimits) -> Router<AppState> {
    let reads = Router::new()
        .route("/api/v1/sites/google", get(sites::list_google_sites))
        .route("/api/v1/sites/bing", get(sites::list_bing_sites))
        .route("/api/v1/sites/matched", get(sites::list_matched_sites))
        .route("/api/v1/reports/history", get(reports::report_history))
        .layer(axum::middleware::from_fn_with_state(
            limits.reads,
            enforce_rate_budget,
        ));

    let generate = Router::new()
        .route("/api/v1/reports", post(reports::generate_report))
        .layer(axum::middleware::from_fn_with_state(
            limits.generate,
            enforce_rate_budget,
        ));

    reads.merge(generate).layer(axum::middleware::from_fn_with_state(
        auth,
        require_bearer_auth,
    ))
}

pub fn build_app(state: AppState, auth: BearerAuth, limits: RateLimits) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, limits))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match rankpulse_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
