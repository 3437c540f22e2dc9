//! Database operations for the `usage_counters` table.
//!
//! The quota counter is the one piece of state requiring a true critical
//! section per account. [`try_consume_quota`] authorizes and commits one
//! unit of usage in a single conditional `UPDATE`, so two racing calls on
//! the last remaining unit cannot both succeed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `usage_counters` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsageCounterRow {
    pub account_id: Uuid,
    pub tier: String,
    pub has_verified_key: bool,
    pub tests_used: i32,
    pub tests_limit: i32,
    pub cycle_started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usage state after a successful [`try_consume_quota`].
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct QuotaReceipt {
    pub tests_used: i32,
    pub tests_limit: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates the account's counter row if it does not exist yet, then returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn ensure_counter(
    pool: &PgPool,
    account_id: Uuid,
    tests_limit: i32,
) -> Result<UsageCounterRow, DbError> {
    sqlx::query(
        "INSERT INTO usage_counters (account_id, tests_limit) \
         VALUES ($1, $2) \
         ON CONFLICT (account_id) DO NOTHING",
    )
    .bind(account_id)
    .bind(tests_limit)
    .execute(pool)
    .await?;

    let row = get_usage(pool, account_id).await?.ok_or(DbError::NotFound)?;
    Ok(row)
}

/// Returns the account's counter, or `None` if never initialized.
///
/// This is a non-binding read — use [`try_consume_quota`] to gate work.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_usage(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<Option<UsageCounterRow>, DbError> {
    let row = sqlx::query_as::<_, UsageCounterRow>(
        "SELECT account_id, tier, has_verified_key, tests_used, tests_limit, \
                cycle_started_at, created_at, updated_at \
         FROM usage_counters \
         WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Atomically authorizes and commits one unit of quota.
///
/// Unlocked accounts (pro tier, or a verified private credential) always
/// pass; everyone else passes while `tests_used < tests_limit`. The usage
/// increment commits in the same statement that authorizes it — the count
/// can never exceed the limit at commit time, and the increment is never
/// rolled back here (monthly rollover is out-of-band).
///
/// Returns `None` when the account is out of quota or has no counter row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn try_consume_quota(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<Option<QuotaReceipt>, DbError> {
    let receipt = sqlx::query_as::<_, QuotaReceipt>(
        "UPDATE usage_counters \
         SET tests_used = tests_used + 1, updated_at = NOW() \
         WHERE account_id = $1 \
           AND (tier = 'pro' OR has_verified_key OR tests_used < tests_limit) \
         RETURNING tests_used, tests_limit",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(receipt)
}

/// Updates the account's subscription tier.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the counter row does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_tier(pool: &PgPool, account_id: Uuid, tier: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE usage_counters SET tier = $1, updated_at = NOW() WHERE account_id = $2",
    )
    .bind(tier)
    .bind(account_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Records whether the account holds a verified private API credential.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the counter row does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_verified_key(
    pool: &PgPool,
    account_id: Uuid,
    verified: bool,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE usage_counters SET has_verified_key = $1, updated_at = NOW() \
         WHERE account_id = $2",
    )
    .bind(verified)
    .bind(account_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
