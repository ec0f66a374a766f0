use thiserror::Error;

/// Errors returned by the Search Console API client.
#[derive(Debug, Error)]
pub enum GscError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error envelope (`{"error": {...}}`).
    #[error("Search Console API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
