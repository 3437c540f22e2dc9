//! Database operations for the `lineups` and `lineup_entries` tables.
//!
//! A lineup is a persisted presentation set: one owner entry plus N cached
//! third-party videos, each with an explicit 0-indexed position.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `lineups` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineupRow {
    pub id: i64,
    pub public_id: Uuid,
    pub account_id: Uuid,
    pub owner_title: String,
    pub owner_thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

/// A row from the `lineup_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineupEntryRow {
    pub id: i64,
    pub lineup_id: i64,
    pub position: i32,
    pub video_id: Option<String>,
    pub is_owner: bool,
}

/// Entry payload for [`insert_lineup`].
#[derive(Debug, Clone)]
pub struct NewLineupEntry {
    pub position: i32,
    /// `None` for the owner entry.
    pub video_id: Option<String>,
    pub is_owner: bool,
}

/// Persists a lineup and its entries in one transaction.
///
/// The `(lineup_id, position)` unique constraint rejects non-contiguous
/// duplicates; callers are expected to pass a contiguous 0-indexed
/// permutation with exactly one owner entry.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the transaction fails.
pub async fn insert_lineup(
    pool: &PgPool,
    account_id: Uuid,
    owner_title: &str,
    owner_thumbnail_url: &str,
    entries: &[NewLineupEntry],
) -> Result<LineupRow, DbError> {
    let public_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    let lineup = sqlx::query_as::<_, LineupRow>(
        "INSERT INTO lineups (public_id, account_id, owner_title, owner_thumbnail_url) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, public_id, account_id, owner_title, owner_thumbnail_url, created_at",
    )
    .bind(public_id)
    .bind(account_id)
    .bind(owner_title)
    .bind(owner_thumbnail_url)
    .fetch_one(&mut *tx)
    .await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO lineup_entries (lineup_id, position, video_id, is_owner) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(lineup.id)
        .bind(entry.position)
        .bind(&entry.video_id)
        .bind(entry.is_owner)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(lineup)
}

/// Returns a lineup's entries ordered by position.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_lineup_entries(
    pool: &PgPool,
    lineup_id: i64,
) -> Result<Vec<LineupEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, LineupEntryRow>(
        "SELECT id, lineup_id, position, video_id, is_owner \
         FROM lineup_entries \
         WHERE lineup_id = $1 \
         ORDER BY position",
    )
    .bind(lineup_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
