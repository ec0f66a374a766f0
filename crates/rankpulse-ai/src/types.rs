//! Narrative request/response types.

use rankpulse_core::{DeltaSet, MonthPoint, PeriodMetrics};
use serde::{Deserialize, Serialize};

/// Pre-computed deltas handed to the model so it never does the math
/// itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeltaPair {
    pub mom: Option<DeltaSet>,
    pub yoy: Option<DeltaSet>,
}

/// One search term's current-month numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStat {
    pub query: String,
    #[serde(flatten)]
    pub metrics: PeriodMetrics,
}

/// One provider's slice of the narrative pack.
///
/// `current: None` means the current-month fetch failed, which also
/// leaves `deltas` empty; a month that genuinely recorded nothing is an
/// all-zero `PeriodMetrics` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub current: Option<PeriodMetrics>,
    pub previous: Option<PeriodMetrics>,
    pub yoy: Option<PeriodMetrics>,
    pub deltas: DeltaPair,
    /// Busiest search terms of the current month; empty for providers
    /// that expose no query data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_queries: Vec<QueryStat>,
    pub last_16_months: Vec<MonthPoint>,
}

/// The full numeric pack sent to the text-generation collaborator and
/// persisted as the report summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub site: String,
    pub month: String,
    pub google: SourceSection,
    pub bing: Option<SourceSection>,
}

/// The structured narrative the model is asked to return.
///
/// Every field defaults to empty when the model's JSON is missing or
/// mis-typed; a partially-shaped response never fails the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub google_section: String,
    #[serde(default)]
    pub bing_section: String,
    #[serde(default)]
    pub trend_summary: String,
    #[serde(default)]
    pub final_summary: String,
}

impl Narrative {
    /// Shape-checks a parsed model response, defaulting every expected
    /// field rather than propagating a type mismatch.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        let str_field = |key: &str| -> String {
            value
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        let highlights = value
            .get("highlights")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            highlights,
            google_section: str_field("google_section"),
            bing_section: str_field("bing_section"),
            trend_summary: str_field("trend_summary"),
            final_summary: str_field("final_summary"),
        }
    }
}

/// Outcome of a narrative call: structured when the model returned
/// parseable JSON, raw otherwise (the text is surfaced for diagnostics
/// instead of failing the report).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum NarrativeOutcome {
    Json { report: Narrative },
    Raw { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_value_defaults_missing_and_mistyped_fields() {
        let value = serde_json::json!({
            "highlights": ["clicks up 25%", 42, "CTR up 1.8pp"],
            "google_section": "solid month",
            "bing_section": 7,
        });
        let narrative = Narrative::from_value(&value);
        assert_eq!(narrative.highlights, vec!["clicks up 25%", "CTR up 1.8pp"]);
        assert_eq!(narrative.google_section, "solid month");
        assert_eq!(narrative.bing_section, "");
        assert_eq!(narrative.trend_summary, "");
    }

    #[test]
    fn from_value_on_non_object_yields_all_defaults() {
        let narrative = Narrative::from_value(&serde_json::json!("just text"));
        assert_eq!(narrative, Narrative::default());
    }
}
