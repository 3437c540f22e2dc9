//! Client for the transcript actor API.
//!
//! Transcripts come from a hosted actor: one synchronous run per video,
//! returning dataset items whose `transcript` field is a list of caption
//! segments. A video without captions is a normal outcome (`Ok(None)`), and
//! every fetch is bounded by a deadline — a slow actor run is that unit's
//! failure, never a pipeline-wide abort.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::YoutubeError;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2/";
const DEFAULT_ACTOR: &str = "tubeforge~caption-scraper";

#[derive(Debug, Deserialize)]
struct DatasetItem {
    #[serde(default)]
    transcript: Vec<TranscriptSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptSegment {
    #[serde(default)]
    text: String,
}

/// Client for the transcript actor.
pub struct TranscriptClient {
    client: Client,
    token: String,
    actor: String,
    base_url: Url,
    timeout_secs: u64,
}

impl TranscriptClient {
    /// Creates a client pointed at the production actor platform.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::UnexpectedStatus`] if
    /// `base_url` is not a valid URL base.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        // The reqwest timeout stays slightly above the logical deadline so
        // the tokio timeout below is the one that fires deterministically.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.saturating_add(5)))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubeforge/0.1 (creator-tooling)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|_| YoutubeError::UnexpectedStatus {
            status: 0,
            url: normalised,
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            actor: DEFAULT_ACTOR.to_owned(),
            base_url,
            timeout_secs,
        })
    }

    /// Fetches a video's transcript, bounded by the configured deadline.
    ///
    /// Returns `Ok(None)` when the actor yields no caption segments — not
    /// every video has one, and that is not an error.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Timeout`] when the run exceeds the deadline.
    /// - [`YoutubeError::Http`] / [`YoutubeError::UnexpectedStatus`] on
    ///   transport failures.
    /// - [`YoutubeError::Deserialize`] if the dataset items are malformed.
    pub async fn fetch_transcript(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<String>, YoutubeError> {
        let deadline = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(deadline, self.run_actor(video_id, language)).await {
            Ok(result) => result,
            Err(_) => Err(YoutubeError::Timeout {
                video_id: video_id.to_string(),
                timeout_secs: self.timeout_secs,
            }),
        }
    }

    async fn run_actor(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<String>, YoutubeError> {
        let mut url = self
            .base_url
            .join(&format!("acts/{}/run-sync-get-dataset-items", self.actor))
            .expect("actor path joins onto a valid base URL");
        url.query_pairs_mut().append_pair("token", &self.token);

        let video_url = format!("https://www.youtube.com/watch?v={video_id}");
        let body = serde_json::json!({
            "youtube_url": video_url,
            "language": language,
        });

        let response = self.client.post(url.clone()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let raw = response.text().await?;
        let items: Vec<DatasetItem> =
            serde_json::from_str(&raw).map_err(|e| YoutubeError::Deserialize {
                context: format!("transcript dataset for {video_id}"),
                source: e,
            })?;

        let mut parts: Vec<String> = Vec::new();
        for item in items {
            for segment in item.transcript {
                if !segment.text.is_empty() {
                    parts.push(segment.text);
                }
            }
        }

        if parts.is_empty() {
            tracing::debug!(video_id, "actor returned no caption segments");
            return Ok(None);
        }

        let transcript = parts.join(" ");
        tracing::debug!(video_id, chars = transcript.len(), "fetched transcript");
        Ok(Some(transcript))
    }
}

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;
