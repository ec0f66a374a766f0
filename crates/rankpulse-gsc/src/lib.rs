//! Primary provider adapter: Google Search Console search analytics.

mod client;
mod error;
mod retry;
mod types;

pub use client::GscClient;
pub use error::GscError;
pub use types::{Dimension, GscSite, PerformanceRow};
