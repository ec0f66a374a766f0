//! Shared domain types, configuration, and the reconciliation core for
//! rankpulse: domain-key normalization, metric aggregation, delta math,
//! month-series assembly, and cross-provider site matching.

mod aggregate;
mod app_config;
mod config;
mod delta;
mod domain_key;
mod matcher;
mod metrics;
mod period;
mod series;

use thiserror::Error;

pub use aggregate::{aggregate, MetricRow};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use delta::{build_deltas, safe_delta_pct};
pub use domain_key::normalize_site_key;
pub use matcher::{match_inventories, MatchedSite, SiteMatches, UnmatchedSite};
pub use metrics::{DeltaSet, MonthPoint, PeriodMetrics};
pub use period::ReportPeriod;
pub use series::{build_month_series, SERIES_CAP};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
