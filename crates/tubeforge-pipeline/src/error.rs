use thiserror::Error;
use uuid::Uuid;

/// User-visible pipeline failures.
///
/// Per-source and per-delegate failures never appear here — they are
/// absorbed into degraded outputs by the research and studio crates. What
/// remains is quota exhaustion, resolution dead ends, missing prerequisites,
/// and infrastructure errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The account is out of monthly quota. Fatal for the requested
    /// operation; nothing was committed.
    #[error("account {account_id} has exhausted its monthly quota")]
    QuotaExceeded { account_id: Uuid },

    /// A generation run needs a cached video to work from.
    #[error("video {video_id} is not in the cache")]
    VideoNotCached { video_id: String },

    /// A generation run needs the primary document.
    #[error("video {video_id} has no transcript; fetch one first")]
    TranscriptMissing { video_id: String },

    /// The preview flow fetched zero usable videos across all channels.
    #[error("no videos could be fetched for the preview")]
    NoVideos,

    #[error(transparent)]
    Resolver(#[from] tubeforge_resolver::ResolverError),

    #[error(transparent)]
    Youtube(#[from] tubeforge_youtube::YoutubeError),

    #[error(transparent)]
    Db(#[from] tubeforge_db::DbError),
}
