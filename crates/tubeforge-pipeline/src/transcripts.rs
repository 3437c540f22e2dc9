//! Lazy transcript fetching over the cache.

use sqlx::PgPool;

use tubeforge_db::{get_transcript, save_transcript, video_exists};
use tubeforge_youtube::TranscriptClient;

use crate::error::PipelineError;

/// Fetches transcripts lazily: cache first, actor second.
///
/// Once a transcript is non-null it is never refetched unless the caller
/// explicitly forces a refresh.
pub struct TranscriptFetcher {
    pool: PgPool,
    client: TranscriptClient,
}

impl TranscriptFetcher {
    #[must_use]
    pub fn new(pool: PgPool, client: TranscriptClient) -> Self {
        Self { pool, client }
    }

    /// Returns the video's transcript, fetching and persisting it on a
    /// cache miss. `Ok(None)` means the video genuinely has no transcript.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::VideoNotCached`] when the video is unknown.
    /// - [`PipelineError::Youtube`] when the actor call fails or times out.
    /// - [`PipelineError::Db`] on store failures.
    pub async fn fetch(
        &self,
        video_id: &str,
        language: &str,
        force_refresh: bool,
    ) -> Result<Option<String>, PipelineError> {
        if !video_exists(&self.pool, video_id).await? {
            return Err(PipelineError::VideoNotCached {
                video_id: video_id.to_string(),
            });
        }

        if !force_refresh {
            if let Some(cached) = get_transcript(&self.pool, video_id).await? {
                tracing::debug!(video_id, "transcript served from cache");
                return Ok(Some(cached));
            }
        }

        tracing::info!(video_id, force_refresh, "fetching transcript from actor");
        let Some(transcript) = self.client.fetch_transcript(video_id, language).await? else {
            return Ok(None);
        };

        save_transcript(&self.pool, video_id, &transcript).await?;
        Ok(Some(transcript))
    }
}
