use thiserror::Error;

/// Errors that abort report generation.
///
/// Per-window fetch failures and persistence failures never appear here;
/// they are downgraded to missing data inside the orchestrator. Only the
/// failures that make the report impossible (no identifier resolution, a
/// provider not configured at all) are surfaced.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested site key has no counterpart in the named provider's
    /// inventory. Maps to 404 semantics at the HTTP layer.
    #[error("site '{key}' not found in {provider}")]
    SiteNotFound { key: String, provider: String },

    /// A required provider credential is missing from the configuration.
    #[error("{provider} is not configured")]
    ProviderNotConfigured { provider: &'static str },

    /// The primary provider's inventory could not be fetched, so
    /// identifiers cannot be resolved.
    #[error(transparent)]
    Gsc(#[from] rankpulse_gsc::GscError),

    /// The secondary provider's inventory could not be fetched.
    #[error(transparent)]
    Bing(#[from] rankpulse_bing::BingError),
}
