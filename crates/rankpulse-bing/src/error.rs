use thiserror::Error;

/// Errors returned by the Bing Webmaster API client.
#[derive(Debug, Error)]
pub enum BingError {
    /// Network or TLS failure from the underlying HTTP client. Treated as
    /// "provider unreachable" by the probe and propagated, unlike
    /// application-level errors which count as a miss.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request (bad key, unknown site, etc).
    #[error("Bing Webmaster API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
