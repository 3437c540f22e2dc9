use thiserror::Error;

use crate::delegate::DelegateRole;

/// Errors from the delegate clients and parse steps.
///
/// Callers of the synthesis and generation stages never see these — both
/// stages absorb them into clearly-marked fallback outputs. They surface
/// only from the lower-level delegate and parse APIs.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The delegate endpoint returned a non-2xx status.
    #[error("{role} delegate returned HTTP status {status}")]
    UnexpectedStatus { role: DelegateRole, status: u16 },

    /// The delegate answered but the completion envelope was unusable.
    #[error("{role} delegate error: {message}")]
    Delegate { role: DelegateRole, message: String },

    /// The structured payload could not be parsed out of the completion.
    #[error("structured payload parse failed for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
