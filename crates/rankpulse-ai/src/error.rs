use thiserror::Error;

/// Errors returned by the narrative-generation client.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completions API returned a non-2xx status.
    #[error("completions API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// The response envelope (not the model's text) was malformed, or the
    /// request pack could not be serialized.
    #[error("JSON error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope parsed but carried no message content.
    #[error("completions response contained no content")]
    EmptyResponse,
}
