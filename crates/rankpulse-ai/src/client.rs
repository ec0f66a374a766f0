//! HTTP client for the chat-completions narrative collaborator.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::NarrativeError;
use crate::prompt::{user_message, INSTRUCTIONS};
use crate::types::{Narrative, NarrativeOutcome, NarrativeRequest};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the narrative-generation API.
pub struct NarrativeClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl NarrativeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, NarrativeError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::Http`] if the HTTP client cannot be
    /// constructed, or [`NarrativeError::Api`] if `base_url` is invalid.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NarrativeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankpulse/0.1 (search-reporting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NarrativeError::Api {
            code: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Generates the narrative for one report pack.
    ///
    /// When the model's output is valid JSON it is shape-checked into a
    /// [`Narrative`] with per-field defaults; otherwise the raw text is
    /// returned as [`NarrativeOutcome::Raw`] so diagnostics survive;
    /// unparseable model output is not an error.
    ///
    /// # Errors
    ///
    /// - [`NarrativeError::Api`] on a non-2xx response.
    /// - [`NarrativeError::Http`] on network failure.
    /// - [`NarrativeError::Deserialize`] if the completion envelope itself
    ///   is malformed.
    /// - [`NarrativeError::EmptyResponse`] if the envelope has no content.
    pub async fn generate(
        &self,
        request: &NarrativeRequest,
    ) -> Result<NarrativeOutcome, NarrativeError> {
        let url = self
            .base_url
            .join("v1/chat/completions")
            .map_err(|e| NarrativeError::Api {
                code: 0,
                message: e.to_string(),
            })?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": INSTRUCTIONS },
                { "role": "user", "content": user_message(request)? },
            ],
            "temperature": 0.3,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let mut message = text;
            message.truncate(200);
            return Err(NarrativeError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let envelope: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| NarrativeError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or(NarrativeError::EmptyResponse)?;

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) if value.is_object() => Ok(NarrativeOutcome::Json {
                report: Narrative::from_value(&value),
            }),
            _ => {
                tracing::warn!(site = %request.site, "narrative output was not JSON; falling back to raw text");
                Ok(NarrativeOutcome::Raw { text: content })
            }
        }
    }
}
