//! Narrative-generation collaborator: turns the computed numeric pack
//! into a client-facing monthly report via a chat-completions API.

mod client;
mod error;
mod prompt;
mod types;

pub use client::NarrativeClient;
pub use error::NarrativeError;
pub use types::{DeltaPair, Narrative, NarrativeOutcome, NarrativeRequest, QueryStat, SourceSection};
