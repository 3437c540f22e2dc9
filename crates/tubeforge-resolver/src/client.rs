//! HTTP client for channel-page resolution.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::ResolverError;
use crate::normalize::{normalize, NormalizedInput};
use crate::patterns::extract_channel_id;

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// A successfully resolved channel input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    /// The raw input as supplied by the caller.
    pub input: String,
    /// The normalized handle (with sigil) when one could be derived.
    pub handle: String,
    /// Canonical channel id.
    pub channel_id: String,
}

/// Result of a batch resolution: both lists preserve the caller's input order.
#[derive(Debug, Clone)]
pub struct BatchResolution {
    pub resolved: Vec<ResolvedChannel>,
    pub unresolved: Vec<String>,
}

/// Client that resolves channel handles by scraping the channel page.
///
/// Use [`ResolverClient::new`] for production or
/// [`ResolverClient::with_base_url`] to point at a mock server in tests.
pub struct ResolverClient {
    client: Client,
    base_url: String,
    batch_width: usize,
}

impl ResolverClient {
    /// Creates a client pointed at the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        batch_width: usize,
    ) -> Result<Self, ResolverError> {
        Self::with_base_url(timeout_secs, user_agent, batch_width, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        batch_width: usize,
        base_url: &str,
    ) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            batch_width: batch_width.max(1),
        })
    }

    /// Resolves one free-form input to its canonical channel id.
    ///
    /// Canonical ids pass through without a fetch. Everything else fetches
    /// the channel page and runs the extraction strategies in priority
    /// order; the first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::NotResolvable`] when the page cannot be
    /// fetched, returns a non-2xx status, or no extraction strategy matches.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedChannel, ResolverError> {
        let (url, handle) = match normalize(input) {
            NormalizedInput::ChannelId(channel_id) => {
                return Ok(ResolvedChannel {
                    input: input.to_string(),
                    handle: input.trim().to_string(),
                    channel_id,
                });
            }
            NormalizedInput::Handle(handle) => {
                (format!("{}/{handle}", self.base_url), handle)
            }
            NormalizedInput::Url(url) => (url.clone(), url),
        };

        let not_resolvable = || ResolverError::NotResolvable {
            input: input.to_string(),
        };

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(input, error = %e, "channel page fetch failed");
                return Err(not_resolvable());
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                input,
                status = response.status().as_u16(),
                "channel page returned non-success status"
            );
            return Err(not_resolvable());
        }

        let html = response.text().await.map_err(|e| {
            tracing::warn!(input, error = %e, "channel page body read failed");
            not_resolvable()
        })?;

        match extract_channel_id(&html) {
            Some((channel_id, strategy)) => {
                tracing::debug!(input, %channel_id, strategy, "resolved channel input");
                Ok(ResolvedChannel {
                    input: input.to_string(),
                    handle,
                    channel_id,
                })
            }
            None => Err(not_resolvable()),
        }
    }

    /// Resolves a batch of inputs through a bounded worker pool.
    ///
    /// Results come back in input order. A single input's failure never
    /// blocks or fails the batch — it lands in `unresolved` instead.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::BatchUnresolvable`] only when zero inputs
    /// resolve.
    pub async fn resolve_batch(&self, inputs: &[String]) -> Result<BatchResolution, ResolverError> {
        let mut outcomes: Vec<(usize, Result<ResolvedChannel, ResolverError>)> =
            stream::iter(inputs.iter().enumerate())
                .map(|(index, input)| async move { (index, self.resolve(input).await) })
                .buffer_unordered(self.batch_width)
                .collect()
                .await;

        // buffer_unordered yields in completion order; restore input order.
        outcomes.sort_by_key(|(index, _)| *index);

        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(channel) => resolved.push(channel),
                Err(e) => {
                    tracing::warn!(input = %inputs[index], error = %e, "handle did not resolve");
                    unresolved.push(inputs[index].clone());
                }
            }
        }

        if resolved.is_empty() && !inputs.is_empty() {
            return Err(ResolverError::BatchUnresolvable {
                attempted: inputs.len(),
            });
        }

        tracing::info!(
            resolved = resolved.len(),
            unresolved = unresolved.len(),
            "batch resolution finished"
        );
        Ok(BatchResolution {
            resolved,
            unresolved,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
