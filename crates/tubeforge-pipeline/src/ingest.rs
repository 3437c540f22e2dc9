//! Channel ingest: the read-through path that fills the entity cache.

use futures::stream::{self, StreamExt};
use sqlx::PgPool;

use tubeforge_db::{
    channel_exists, get_channel, get_channel_by_handle, upsert_channel, upsert_video, NewChannel,
    NewVideo,
};
use tubeforge_resolver::{normalize, NormalizedInput, ResolverClient};
use tubeforge_youtube::YoutubeClient;

use crate::error::PipelineError;

/// Knobs for the ingest path.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub videos_per_channel: u32,
    pub lookback_days: i64,
    pub longform_min_secs: i32,
    pub shorts_max_secs: i32,
    /// Worker-pool width for multi-channel ingest.
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            videos_per_channel: 5,
            lookback_days: 365,
            longform_min_secs: 300,
            shorts_max_secs: 60,
            concurrency: 4,
        }
    }
}

/// Result of ingesting one channel.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub videos_stored: usize,
    /// The channel was already cached and `force_refresh` was off, so no
    /// metadata fetch happened.
    pub already_cached: bool,
}

/// Aggregate of a multi-channel ingest round.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub outcomes: Vec<IngestOutcome>,
    /// Inputs that failed, with their reasons. Partial failure is normal —
    /// one dead channel never sinks the round.
    pub failures: Vec<(String, anyhow::Error)>,
}

impl IngestSummary {
    #[must_use]
    pub fn videos_stored(&self) -> usize {
        self.outcomes.iter().map(|o| o.videos_stored).sum()
    }
}

/// Resolves channel inputs and fills the cache with their recent videos.
pub struct ChannelIngestor {
    pool: PgPool,
    resolver: ResolverClient,
    youtube: YoutubeClient,
    config: IngestConfig,
}

impl ChannelIngestor {
    #[must_use]
    pub fn new(
        pool: PgPool,
        resolver: ResolverClient,
        youtube: YoutubeClient,
        config: IngestConfig,
    ) -> Self {
        Self {
            pool,
            resolver,
            youtube,
            config,
        }
    }

    /// Ingests one channel input (handle, URL, or canonical id).
    ///
    /// Read-through semantics: a channel that is already cached returns
    /// immediately unless `force_refresh` is set. A fresh or forced ingest
    /// fetches metadata, then upserts the channel and every qualifying
    /// video — refreshing view counts, buckets, and fetch bookkeeping.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Resolver`] when the input cannot be resolved.
    /// - [`PipelineError::Youtube`] when the metadata source fails.
    /// - [`PipelineError::Db`] on store failures.
    pub async fn ingest_channel(
        &self,
        input: &str,
        force_refresh: bool,
    ) -> Result<IngestOutcome, PipelineError> {
        // Resolution cache hit: a handle that already maps to a cached
        // channel skips both the page scrape and the metadata fetch.
        if !force_refresh {
            if let NormalizedInput::Handle(handle) = normalize(input) {
                if let Some(cached) = get_channel_by_handle(&self.pool, &handle).await? {
                    tracing::info!(
                        handle = %handle,
                        channel_id = %cached.channel_id,
                        "handle already resolved and cached — skipping fetch"
                    );
                    return Ok(IngestOutcome {
                        channel_id: cached.channel_id,
                        channel_name: cached.name,
                        videos_stored: 0,
                        already_cached: true,
                    });
                }
            }
        }

        let resolved = self.resolver.resolve(input).await?;

        if !force_refresh && channel_exists(&self.pool, &resolved.channel_id).await? {
            let cached = get_channel(&self.pool, &resolved.channel_id).await?;
            tracing::info!(
                channel_id = %resolved.channel_id,
                "channel already cached — skipping fetch"
            );
            return Ok(IngestOutcome {
                channel_id: resolved.channel_id,
                channel_name: cached.and_then(|c| c.name),
                videos_stored: 0,
                already_cached: true,
            });
        }

        let info = self.youtube.get_channel_info(&resolved.channel_id).await?;
        let channel = upsert_channel(
            &self.pool,
            &NewChannel {
                channel_id: info.channel_id.clone(),
                handle: resolved.handle.clone(),
                name: Some(info.title.clone()),
                avatar_url: info.avatar_url.clone(),
                subscriber_count: info.subscriber_count,
            },
        )
        .await?;

        let records = self
            .youtube
            .list_recent_videos(
                &info.channel_id,
                self.config.lookback_days,
                self.config.longform_min_secs,
                self.config.videos_per_channel,
            )
            .await?;

        let mut stored = 0usize;
        for record in &records {
            let video = NewVideo {
                video_id: record.video_id.clone(),
                channel_id: info.channel_id.clone(),
                title: record.title.clone(),
                thumbnail_url: record.thumbnail_url.clone(),
                view_count: record.view_count,
                published_at: record.published_at,
                duration_seconds: Some(record.duration_seconds),
            };
            match upsert_video(&self.pool, &video, self.config.shorts_max_secs).await {
                Ok(_) => stored += 1,
                Err(e) => {
                    // One bad row should not abort the channel.
                    tracing::warn!(video_id = %record.video_id, error = %e, "video upsert failed");
                }
            }
        }

        tracing::info!(
            channel_id = %info.channel_id,
            fetched = records.len(),
            stored,
            "channel ingested"
        );
        Ok(IngestOutcome {
            channel_id: info.channel_id,
            channel_name: channel.name,
            videos_stored: stored,
            already_cached: false,
        })
    }

    /// Ingests a set of channels through a bounded worker pool.
    ///
    /// Per-channel isolation: failures land in `failures` and never abort
    /// the round.
    pub async fn ingest_channels(&self, inputs: &[String], force_refresh: bool) -> IngestSummary {
        let results: Vec<(String, Result<IngestOutcome, PipelineError>)> = stream::iter(inputs)
            .map(|input| async move {
                (input.clone(), self.ingest_channel(input, force_refresh).await)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut summary = IngestSummary::default();
        for (input, result) in results {
            match result {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(input = %input, error = %e, "channel ingest failed");
                    summary.failures.push((input, e.into()));
                }
            }
        }

        tracing::info!(
            ok = summary.outcomes.len(),
            failed = summary.failures.len(),
            videos = summary.videos_stored(),
            "channel ingest round finished"
        );
        summary
    }
}
