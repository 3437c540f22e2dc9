//! Database operations for the `generation_runs` table.
//!
//! A generation run persists the final output together with the full
//! selected inputs (angle, brief, source list) so any result can be audited
//! against what the pipeline actually saw.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `generation_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub account_id: Uuid,
    pub video_id: String,
    pub angle: Value,
    pub brief: Value,
    /// `"delegate"` or `"fallback"`.
    pub brief_origin: String,
    pub script: String,
    /// JSONB array of exactly four title variants.
    pub titles: Value,
    /// JSONB array of exactly four thumbnail-concept variants.
    pub thumbnails: Value,
    /// `"delegate"` or `"fallback"`.
    pub script_origin: String,
    /// JSONB array of the research source names that populated the bundle.
    pub sources_used: Value,
    pub created_at: DateTime<Utc>,
}

/// Payload for [`insert_generation_run`].
#[derive(Debug, Clone)]
pub struct NewGenerationRun {
    pub account_id: Uuid,
    pub video_id: String,
    pub angle: Value,
    pub brief: Value,
    pub brief_origin: String,
    pub script: String,
    pub titles: Value,
    pub thumbnails: Value,
    pub script_origin: String,
    pub sources_used: Value,
}

const RUN_COLUMNS: &str = "id, public_id, account_id, video_id, angle, brief, brief_origin, \
     script, titles, thumbnails, script_origin, sources_used, created_at";

/// Persists a completed generation run and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_generation_run(
    pool: &PgPool,
    run: &NewGenerationRun,
) -> Result<GenerationRunRow, DbError> {
    let public_id = Uuid::new_v4();
    let sql = format!(
        "INSERT INTO generation_runs \
             (public_id, account_id, video_id, angle, brief, brief_origin, \
              script, titles, thumbnails, script_origin, sources_used) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {RUN_COLUMNS}"
    );

    let row = sqlx::query_as::<_, GenerationRunRow>(&sql)
        .bind(public_id)
        .bind(run.account_id)
        .bind(&run.video_id)
        .bind(&run.angle)
        .bind(&run.brief)
        .bind(&run.brief_origin)
        .bind(&run.script)
        .bind(&run.titles)
        .bind(&run.thumbnails)
        .bind(&run.script_origin)
        .bind(&run.sources_used)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Returns a generation run by its public id, or `None` if unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_generation_run(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<GenerationRunRow>, DbError> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM generation_runs WHERE public_id = $1");
    let row = sqlx::query_as::<_, GenerationRunRow>(&sql)
        .bind(public_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Lists an account's generation runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_generation_runs(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<Vec<GenerationRunRow>, DbError> {
    let sql = format!(
        "SELECT {RUN_COLUMNS} FROM generation_runs \
         WHERE account_id = $1 \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, GenerationRunRow>(&sql)
        .bind(account_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
