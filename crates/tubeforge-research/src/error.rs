use thiserror::Error;

/// Errors from the research source clients and orchestrator.
///
/// Individual source failures never leave [`crate::gather`] — they are
/// absorbed into absent bundle slots. Only the all-sources-failed case is
/// fatal for a bundle.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Every source failed; there is nothing to synthesize from.
    #[error("all research sources failed for topic: {topic}")]
    AllSourcesFailed { topic: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The API answered successfully but with an unusable payload.
    #[error("{source_name} API error: {message}")]
    Api {
        source_name: &'static str,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An individual source call exceeded its deadline.
    #[error("{source_name} call timed out after {timeout_secs}s")]
    Timeout {
        source_name: &'static str,
        timeout_secs: u64,
    },
}
