//! Explicitly constructed provider clients, built once from config and
//! passed wherever they are needed; no module-level globals.

use rankpulse_ai::NarrativeClient;
use rankpulse_bing::BingClient;
use rankpulse_core::AppConfig;
use rankpulse_gsc::GscClient;

use crate::error::ReportError;

/// The bundle of external collaborators the orchestrator talks to.
///
/// `bing` and `narrative` are optional: without a Bing key the service
/// can still list the Google inventory and serve history, and without an
/// OpenAI key reports carry a placeholder narrative.
pub struct Providers {
    pub gsc: GscClient,
    pub bing: Option<BingClient>,
    pub narrative: Option<NarrativeClient>,
}

impl Providers {
    /// Builds all configured clients from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ProviderNotConfigured`] when the Google
    /// access token is absent, or the underlying client errors when an
    /// HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReportError> {
        let token = config
            .google_access_token
            .as_deref()
            .ok_or(ReportError::ProviderNotConfigured {
                provider: "google search console",
            })?;

        let gsc = GscClient::new(token, config.provider_timeout_secs)?.with_retry_policy(
            config.provider_max_retries,
            config.provider_retry_backoff_ms,
        );

        let bing = config
            .bing_api_key
            .as_deref()
            .map(|key| BingClient::new(key, config.provider_timeout_secs))
            .transpose()?;

        let narrative = config
            .openai_api_key
            .as_deref()
            .map(|key| {
                // Narrative calls are slower than metric fetches; give them
                // headroom beyond the provider timeout.
                NarrativeClient::new(key, &config.openai_model, config.provider_timeout_secs.max(60))
            })
            .transpose()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to construct narrative client");
                ReportError::ProviderNotConfigured {
                    provider: "narrative generation",
                }
            })?;

        Ok(Self {
            gsc,
            bing,
            narrative,
        })
    }

    pub(crate) fn require_bing(&self) -> Result<&BingClient, ReportError> {
        self.bing.as_ref().ok_or(ReportError::ProviderNotConfigured {
            provider: "bing webmaster",
        })
    }
}
