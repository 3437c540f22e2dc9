//! The quota gate: authorization and accounting for expensive operations.

use sqlx::PgPool;
use uuid::Uuid;

use tubeforge_core::AccountTier;
use tubeforge_db::{ensure_counter, get_usage, try_consume_quota};

use crate::error::PipelineError;

/// Gates one unit of expensive work per call against the account's monthly
/// allowance.
///
/// The binding path is [`QuotaGate::try_acquire`]: authorization and the
/// usage increment commit in a single conditional update, so two racing
/// calls on the last remaining unit cannot both pass. [`QuotaGate::authorize`]
/// is a non-binding read for display purposes only — never use it to gate
/// work.
#[derive(Clone)]
pub struct QuotaGate {
    pool: PgPool,
    default_limit: i32,
}

impl QuotaGate {
    #[must_use]
    pub fn new(pool: PgPool, default_limit: i32) -> Self {
        Self {
            pool,
            default_limit,
        }
    }

    /// Non-binding check: would a unit of work currently be admitted?
    ///
    /// Unlocked accounts (pro tier, or a verified private credential) are
    /// always admitted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Db`] if the counter cannot be read.
    pub async fn authorize(&self, account_id: Uuid) -> Result<bool, PipelineError> {
        let counter = match get_usage(&self.pool, account_id).await? {
            Some(counter) => counter,
            None => ensure_counter(&self.pool, account_id, self.default_limit).await?,
        };

        let unlocked =
            AccountTier::parse(&counter.tier) == AccountTier::Pro || counter.has_verified_key;
        Ok(unlocked || counter.tests_used < counter.tests_limit)
    }

    /// Atomically authorizes and commits one unit of usage.
    ///
    /// The increment is never rolled back — monthly rollover is a separate
    /// out-of-band process.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::QuotaExceeded`] when the account is out of quota.
    /// - [`PipelineError::Db`] on store failures.
    pub async fn try_acquire(&self, account_id: Uuid) -> Result<(), PipelineError> {
        ensure_counter(&self.pool, account_id, self.default_limit).await?;

        match try_consume_quota(&self.pool, account_id).await? {
            Some(receipt) => {
                tracing::debug!(
                    %account_id,
                    used = receipt.tests_used,
                    limit = receipt.tests_limit,
                    "quota unit committed"
                );
                Ok(())
            }
            None => {
                tracing::info!(%account_id, "quota exhausted — operation denied");
                Err(PipelineError::QuotaExceeded { account_id })
            }
        }
    }
}
