//! Database operations for the `videos` table.
//!
//! Videos are cached forever — staleness is an accepted trade-off, and
//! re-fetching is always caller-initiated. The derived `is_short` flag and
//! `view_bucket` label are recomputed from the incoming payload on every
//! upsert so a stored bucket can never disagree with the stored view count.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tubeforge_core::{is_short, ViewBucket};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `videos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRow {
    pub id: i64,
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub view_count: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
    pub is_short: bool,
    pub view_bucket: Option<String>,
    pub transcript: Option<String>,
    pub transcript_fetched_at: Option<DateTime<Utc>>,
    pub last_fetched_at: DateTime<Utc>,
    pub fetch_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for [`upsert_video`].
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub view_count: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
}

const VIDEO_COLUMNS: &str = "id, video_id, channel_id, title, thumbnail_url, view_count, \
     published_at, duration_seconds, is_short, view_bucket, transcript, \
     transcript_fetched_at, last_fetched_at, fetch_count, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a video or refreshes the cached copy.
///
/// Idempotent on `video_id`: mutable fields (title, view count, thumbnail)
/// are overwritten, `fetch_count` incremented, `last_fetched_at` reset, and
/// both derived fields recomputed from the payload. The transcript columns
/// are untouched — they belong to the lazy transcript path.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_video(
    pool: &PgPool,
    video: &NewVideo,
    shorts_max_secs: i32,
) -> Result<VideoRow, DbError> {
    let short = video
        .duration_seconds
        .is_some_and(|d| is_short(d, shorts_max_secs));
    let bucket = video
        .view_count
        .and_then(ViewBucket::from_views)
        .map(ViewBucket::as_str);

    let sql = format!(
        "INSERT INTO videos (video_id, channel_id, title, thumbnail_url, view_count, \
                             published_at, duration_seconds, is_short, view_bucket) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (video_id) DO UPDATE SET \
             title = EXCLUDED.title, \
             thumbnail_url = EXCLUDED.thumbnail_url, \
             view_count = EXCLUDED.view_count, \
             published_at = EXCLUDED.published_at, \
             duration_seconds = EXCLUDED.duration_seconds, \
             is_short = EXCLUDED.is_short, \
             view_bucket = EXCLUDED.view_bucket, \
             fetch_count = videos.fetch_count + 1, \
             last_fetched_at = NOW() \
         RETURNING {VIDEO_COLUMNS}"
    );

    let row = sqlx::query_as::<_, VideoRow>(&sql)
        .bind(&video.video_id)
        .bind(&video.channel_id)
        .bind(&video.title)
        .bind(&video.thumbnail_url)
        .bind(video.view_count)
        .bind(video.published_at)
        .bind(video.duration_seconds)
        .bind(short)
        .bind(bucket)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Returns whether a video is already cached. Read-only — never fetches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn video_exists(pool: &PgPool, video_id: &str) -> Result<bool, DbError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM videos WHERE video_id = $1)")
            .bind(video_id)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Returns a cached video by canonical id, or `None` if never fetched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_video(pool: &PgPool, video_id: &str) -> Result<Option<VideoRow>, DbError> {
    let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE video_id = $1");
    let row = sqlx::query_as::<_, VideoRow>(&sql)
        .bind(video_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Lists cached videos, optionally filtered by channel and/or bucket label,
/// ordered by view count descending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_videos(
    pool: &PgPool,
    channel_id: Option<&str>,
    bucket: Option<&str>,
) -> Result<Vec<VideoRow>, DbError> {
    let mut sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE 1 = 1");
    if channel_id.is_some() {
        sql.push_str(" AND channel_id = $1");
    }
    if bucket.is_some() {
        // Parameter index depends on whether the channel filter is present.
        if channel_id.is_some() {
            sql.push_str(" AND view_bucket = $2");
        } else {
            sql.push_str(" AND view_bucket = $1");
        }
    }
    sql.push_str(" ORDER BY view_count DESC NULLS LAST");

    let mut query = sqlx::query_as::<_, VideoRow>(&sql);
    if let Some(channel_id) = channel_id {
        query = query.bind(channel_id.to_owned());
    }
    if let Some(bucket) = bucket {
        query = query.bind(bucket.to_owned());
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Returns `(bucket_label, count)` pairs for a channel's bucketed videos.
/// Videos below the bucket floor (NULL label) are not reported.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn bucket_stats(pool: &PgPool, channel_id: &str) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT view_bucket, COUNT(*) \
         FROM videos \
         WHERE channel_id = $1 AND view_bucket IS NOT NULL \
         GROUP BY view_bucket",
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the cached transcript for a video, or `None` when the video is
/// unknown or its transcript has not been fetched yet. Read-only.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_transcript(pool: &PgPool, video_id: &str) -> Result<Option<String>, DbError> {
    let transcript = sqlx::query_scalar::<_, Option<String>>(
        "SELECT transcript FROM videos WHERE video_id = $1",
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(transcript.flatten())
}

/// Stores a fetched transcript and stamps `transcript_fetched_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the video is not cached, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn save_transcript(
    pool: &PgPool,
    video_id: &str,
    transcript: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE videos \
         SET transcript = $1, transcript_fetched_at = NOW() \
         WHERE video_id = $2",
    )
    .bind(transcript)
    .bind(video_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
