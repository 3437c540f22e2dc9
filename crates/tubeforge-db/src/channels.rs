//! Database operations for the `channels` table.
//!
//! Channels are a shared cache: rows have no owner, are created on first
//! successful resolution, and are updated (never deleted) on every
//! subsequent fetch.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: i64,
    pub channel_id: String,
    pub handle: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<i64>,
    pub last_fetched_at: DateTime<Utc>,
    pub fetch_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for [`upsert_channel`].
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub channel_id: String,
    pub handle: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a channel or refreshes the cached copy.
///
/// Idempotent on `channel_id`: a fresh row starts at `fetch_count = 1`; an
/// existing row gets its mutable fields overwritten, `fetch_count`
/// incremented, and `last_fetched_at` reset. `None` fields in the payload
/// never clobber previously-cached values.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_channel(pool: &PgPool, channel: &NewChannel) -> Result<ChannelRow, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "INSERT INTO channels (channel_id, handle, name, avatar_url, subscriber_count) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (channel_id) DO UPDATE SET \
             handle = EXCLUDED.handle, \
             name = COALESCE(EXCLUDED.name, channels.name), \
             avatar_url = COALESCE(EXCLUDED.avatar_url, channels.avatar_url), \
             subscriber_count = COALESCE(EXCLUDED.subscriber_count, channels.subscriber_count), \
             fetch_count = channels.fetch_count + 1, \
             last_fetched_at = NOW() \
         RETURNING id, channel_id, handle, name, avatar_url, subscriber_count, \
                   last_fetched_at, fetch_count, created_at",
    )
    .bind(&channel.channel_id)
    .bind(&channel.handle)
    .bind(&channel.name)
    .bind(&channel.avatar_url)
    .bind(channel.subscriber_count)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns whether a channel is already cached. Read-only — never fetches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn channel_exists(pool: &PgPool, channel_id: &str) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM channels WHERE channel_id = $1)",
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Returns a cached channel by its handle, or `None` if never resolved.
///
/// This is the resolver's cache hit path: a handle that already maps to a
/// canonical id skips the channel-page fetch entirely.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_channel_by_handle(
    pool: &PgPool,
    handle: &str,
) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, channel_id, handle, name, avatar_url, subscriber_count, \
                last_fetched_at, fetch_count, created_at \
         FROM channels \
         WHERE handle = $1 \
         ORDER BY last_fetched_at DESC \
         LIMIT 1",
    )
    .bind(handle)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a cached channel by canonical id, or `None` if never fetched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_channel(pool: &PgPool, channel_id: &str) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, channel_id, handle, name, avatar_url, subscriber_count, \
                last_fetched_at, fetch_count, created_at \
         FROM channels \
         WHERE channel_id = $1",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
