//! Request middleware: request ids, bearer-token auth, and per-route
//! rate budgets.
//!
//! Rate limiting is split by route class. A report generation fans out
//! into two provider APIs and a model completion, so it runs on a much
//! smaller budget than the read endpoints, which only touch Postgres or
//! a single listing call.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token auth settings, from `RANKPULSE_API_KEYS`.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl BearerAuth {
    /// Reads the comma-separated token list from `RANKPULSE_API_KEYS`.
    ///
    /// An empty or missing list disables auth in development and fails
    /// startup everywhere else.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("RANKPULSE_API_KEYS").unwrap_or_default();
        let keys: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "RANKPULSE_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    keys: Arc::new(HashSet::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "RANKPULSE_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            keys: Arc::new(keys),
            enabled: true,
        })
    }

    fn allows(&self, token: &str) -> bool {
        self.keys.contains(token)
    }
}

#[derive(Debug)]
struct BudgetWindow {
    started_at: Instant,
    count: usize,
}

/// A named fixed-window request budget. Each route class carries its
/// own instance; the scope names the class in logs and 429 bodies.
#[derive(Debug, Clone)]
pub struct RateBudget {
    scope: &'static str,
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<BudgetWindow>>,
}

impl RateBudget {
    #[must_use]
    pub fn new(scope: &'static str, max_requests: usize, window: Duration) -> Self {
        Self {
            scope,
            max_requests,
            window,
            state: Arc::new(Mutex::new(BudgetWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Counts one request against the window; `false` when exhausted.
    async fn admit(&self) -> bool {
        let mut window = self.state.lock().await;
        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is honored; otherwise a new
/// `UUIDv4` is generated. The ID lands in request extensions as
/// [`RequestId`] and on the response as `x-request-id`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing bearer auth when enabled.
pub async fn require_bearer_auth(
    State(auth): State<BearerAuth>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => reject(
            &req,
            "unauthorized",
            "missing or invalid bearer token".to_owned(),
        ),
    }
}

/// Middleware charging the request against its route class's budget.
pub async fn enforce_rate_budget(
    State(budget): State<RateBudget>,
    req: Request,
    next: Next,
) -> Response {
    if budget.admit().await {
        return next.run(req).await;
    }

    tracing::warn!(scope = budget.scope, "request budget exhausted");
    reject(
        &req,
        "rate_limited",
        format!("{} rate limit exceeded, retry shortly", budget.scope),
    )
}

/// Builds a rejection in the standard error envelope, reusing the id the
/// request-id layer attached.
fn reject(req: &Request, code: &str, message: String) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| Uuid::new_v4().to_string(), |id| id.0.clone());
    ApiError::new(request_id, code, message).into_response()
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
