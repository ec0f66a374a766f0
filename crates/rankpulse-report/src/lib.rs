//! Report orchestration: resolves provider identifiers, fetches the
//! calendar windows, computes deltas and series, calls the narrative
//! collaborator, and persists the result.

mod daily;
mod error;
mod orchestrate;
mod providers;
mod sites;
mod types;

pub use daily::build_daily_series;
pub use error::ReportError;
pub use orchestrate::{build_report, generate_report};
pub use providers::Providers;
pub use sites::site_inventories;
pub use types::{ComputedReport, DailyEntry, GeneratedReport};
