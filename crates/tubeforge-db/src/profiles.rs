//! Database operations for the `creator_profiles` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `creator_profiles` table. Free-text fields are prompt
/// context only — no invariants beyond one profile per account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorProfileRow {
    pub id: i64,
    pub account_id: Uuid,
    pub display_name: Option<String>,
    pub niche: Option<String>,
    pub tone: Option<String>,
    pub target_audience: Option<String>,
    /// JSONB array of expertise-area strings.
    pub expertise: Value,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for [`upsert_profile`].
#[derive(Debug, Clone)]
pub struct NewCreatorProfile {
    pub account_id: Uuid,
    pub display_name: Option<String>,
    pub niche: Option<String>,
    pub tone: Option<String>,
    pub target_audience: Option<String>,
    pub expertise: Vec<String>,
    pub bio: Option<String>,
}

/// Inserts or replaces the account's creator profile.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_profile(
    pool: &PgPool,
    profile: &NewCreatorProfile,
) -> Result<CreatorProfileRow, DbError> {
    let expertise =
        serde_json::to_value(&profile.expertise).unwrap_or_else(|_| Value::Array(Vec::new()));

    let row = sqlx::query_as::<_, CreatorProfileRow>(
        "INSERT INTO creator_profiles \
             (account_id, display_name, niche, tone, target_audience, expertise, bio) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (account_id) DO UPDATE SET \
             display_name = EXCLUDED.display_name, \
             niche = EXCLUDED.niche, \
             tone = EXCLUDED.tone, \
             target_audience = EXCLUDED.target_audience, \
             expertise = EXCLUDED.expertise, \
             bio = EXCLUDED.bio, \
             updated_at = NOW() \
         RETURNING id, account_id, display_name, niche, tone, target_audience, \
                   expertise, bio, created_at, updated_at",
    )
    .bind(profile.account_id)
    .bind(&profile.display_name)
    .bind(&profile.niche)
    .bind(&profile.tone)
    .bind(&profile.target_audience)
    .bind(expertise)
    .bind(&profile.bio)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the account's profile, or `None` if none has been saved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<Option<CreatorProfileRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorProfileRow>(
        "SELECT id, account_id, display_name, niche, tone, target_audience, \
                expertise, bio, created_at, updated_at \
         FROM creator_profiles \
         WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
