//! Per-source retry wrapper.
//!
//! Retry counts are configured per source rather than hard-coded: the
//! verification source defaults to one retry, the others to zero. Retrying
//! is part of each source's isolation wrapper, not a pipeline-wide policy.

use std::future::Future;
use std::time::Duration;

use crate::error::ResearchError;

/// Returns `true` for errors worth retrying: network-level failures and
/// server-side 5xx responses. Deserialization problems and timeouts are not
/// retried — a timeout already consumed the unit's deadline.
fn is_retriable(err: &ResearchError) -> bool {
    match err {
        ResearchError::Http(e) => e.is_timeout() || e.is_connect(),
        ResearchError::UnexpectedStatus { status, .. } => *status >= 500,
        ResearchError::AllSourcesFailed { .. }
        | ResearchError::Api { .. }
        | ResearchError::Deserialize { .. }
        | ResearchError::Timeout { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// retriable errors, backing off `backoff_base_ms * 2^attempt` between
/// tries.
pub(crate) async fn retry_source<T, F, Fut>(
    source: &'static str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ResearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ResearchError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(10));
                tracing::warn!(
                    source,
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient source error — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}
