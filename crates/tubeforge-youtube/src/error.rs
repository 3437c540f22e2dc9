use thiserror::Error;

/// Errors returned by the metadata and transcript clients.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The requested channel does not exist (empty `items` array).
    #[error("channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The transcript fetch exceeded its deadline.
    #[error("transcript fetch timed out after {timeout_secs}s for {video_id}")]
    Timeout { video_id: String, timeout_secs: u64 },
}
