//! Site inventory endpoints.

use axum::{extract::State, response::IntoResponse, Extension, Json};
use rankpulse_core::normalize_site_key;
use rankpulse_report::site_inventories;
use serde::Serialize;

use super::{map_report_error, require_providers, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::middleware::RequestId;

/// One inventory entry with its provider identifier and the normalized
/// key used for matching and report requests.
#[derive(Debug, Serialize)]
pub(super) struct SiteItem {
    pub url: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

pub(super) async fn list_google_sites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let providers = match require_providers(&state, &req_id.0) {
        Ok(p) => p,
        Err(e) => return e.into_response(),
    };

    match providers.gsc.list_sites().await {
        Ok(sites) => {
            let data: Vec<SiteItem> = sites
                .into_iter()
                .map(|site| SiteItem {
                    key: normalize_site_key(&site.site_url),
                    url: site.site_url,
                    permission_level: site.permission_level,
                    verified: None,
                })
                .collect();
            Json(ApiResponse {
                data,
                meta: ResponseMeta::new(req_id.0),
            })
            .into_response()
        }
        Err(e) => map_report_error(req_id.0, &e.into()).into_response(),
    }
}

pub(super) async fn list_bing_sites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let providers = match require_providers(&state, &req_id.0) {
        Ok(p) => p,
        Err(e) => return e.into_response(),
    };
    let Some(bing) = providers.bing.as_ref() else {
        return super::ApiError::new(
            req_id.0,
            "provider_not_configured",
            "bing webmaster is not configured",
        )
        .into_response();
    };

    match bing.get_user_sites().await {
        Ok(sites) => {
            let data: Vec<SiteItem> = sites
                .into_iter()
                .map(|site| SiteItem {
                    key: normalize_site_key(&site.url),
                    url: site.url,
                    permission_level: None,
                    verified: Some(site.is_verified),
                })
                .collect();
            Json(ApiResponse {
                data,
                meta: ResponseMeta::new(req_id.0),
            })
            .into_response()
        }
        Err(e) => map_report_error(req_id.0, &e.into()).into_response(),
    }
}

pub(super) async fn list_matched_sites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let providers = match require_providers(&state, &req_id.0) {
        Ok(p) => p,
        Err(e) => return e.into_response(),
    };

    match site_inventories(&providers).await {
        Ok(matches) => Json(ApiResponse {
            data: matches,
            meta: ResponseMeta::new(req_id.0),
        })
        .into_response(),
        Err(e) => map_report_error(req_id.0, &e).into_response(),
    }
}
