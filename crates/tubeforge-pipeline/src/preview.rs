//! The preview lineup flow: the sibling pipeline that renders a creator's
//! thumbnail inside a grid of cached competitor videos.
//!
//! Suggestions feed batch resolution, resolution feeds the entity cache,
//! and the cached long-form videos feed the shuffle engine. Shorts stay in
//! the cache but never reach the display set.

use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use tubeforge_db::{insert_lineup, list_videos, LineupRow, NewLineupEntry};
use tubeforge_lineup::{build_lineup, Lineup};
use tubeforge_resolver::ResolverError;
use tubeforge_studio::ChannelSuggester;

use crate::error::PipelineError;
use crate::ingest::ChannelIngestor;
use crate::quota::QuotaGate;
use crate::session::ShuffleSessions;

/// Everything [`build_preview`] needs.
pub struct PreviewDeps {
    pub pool: PgPool,
    pub gate: QuotaGate,
    pub suggester: ChannelSuggester,
    pub ingestor: ChannelIngestor,
    pub sessions: std::sync::Arc<ShuffleSessions>,
    pub suggested_channels: usize,
}

/// One preview request.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub account_id: Uuid,
    /// Target-viewer persona driving the channel suggestions.
    pub persona: String,
    /// The creator's candidate title.
    pub title: String,
    /// Storage key of the uploaded thumbnail — the owner entry's reference.
    pub thumbnail_key: String,
}

/// A built preview: the persisted lineup plus the session handle for
/// network-free re-shuffles.
#[derive(Debug)]
pub struct PreviewOutcome {
    pub lineup_row: LineupRow,
    pub lineup: Lineup,
    pub session_id: Uuid,
    pub suggested: Vec<String>,
    pub unresolved: Vec<String>,
}

/// Builds one preview end to end.
///
/// # Errors
///
/// - [`PipelineError::QuotaExceeded`] when the account is out of quota —
///   nothing is fetched or stored in that case.
/// - [`PipelineError::Resolver`] when zero suggested channels resolve.
/// - [`PipelineError::NoVideos`] when the cache ends up with no usable
///   long-form videos for the grid.
/// - [`PipelineError::Db`] on store failures.
pub async fn build_preview<R: Rng + Send>(
    deps: &PreviewDeps,
    request: &PreviewRequest,
    rng: &mut R,
) -> Result<PreviewOutcome, PipelineError> {
    deps.gate.try_acquire(request.account_id).await?;
    tracing::info!(account_id = %request.account_id, "preview admitted");

    // Channel discovery. The suggester never fails — worst case it serves
    // its static list.
    let suggested = deps
        .suggester
        .suggest(&request.persona, deps.suggested_channels)
        .await;

    // Resolution + cache fill, with per-channel isolation.
    let summary = deps.ingestor.ingest_channels(&suggested, false).await;
    if summary.outcomes.is_empty() {
        return Err(PipelineError::Resolver(ResolverError::BatchUnresolvable {
            attempted: suggested.len(),
        }));
    }
    let unresolved: Vec<String> = summary.failures.iter().map(|(input, _)| input.clone()).collect();

    // Display set: cached long-form videos from the resolved channels.
    // Shorts stay cached for analytics but are filtered out of the grid.
    // Distinct handles can resolve to the same canonical channel; dedupe so
    // its videos enter the grid once.
    let mut seen_channels = std::collections::HashSet::new();
    let mut competitor_keys = Vec::new();
    for outcome in &summary.outcomes {
        if !seen_channels.insert(outcome.channel_id.clone()) {
            continue;
        }
        let rows = list_videos(&deps.pool, Some(&outcome.channel_id), None).await?;
        competitor_keys.extend(
            rows.into_iter()
                .filter(|row| !row.is_short && row.duration_seconds.is_some())
                .map(|row| row.video_id),
        );
    }
    if competitor_keys.is_empty() {
        return Err(PipelineError::NoVideos);
    }

    let lineup = build_lineup(&request.thumbnail_key, competitor_keys, rng);

    // Persist positions exactly as rendered.
    let entries: Vec<NewLineupEntry> = lineup
        .entries
        .iter()
        .map(|item| NewLineupEntry {
            position: i32::try_from(item.position).unwrap_or(i32::MAX),
            video_id: (!item.is_owner).then(|| item.key.clone()),
            is_owner: item.is_owner,
        })
        .collect();
    let lineup_row = insert_lineup(
        &deps.pool,
        request.account_id,
        &request.title,
        &request.thumbnail_key,
        &entries,
    )
    .await?;

    // Park the keys so re-shuffles are pure re-randomization.
    let session_id = deps
        .sessions
        .insert(request.thumbnail_key.clone(), lineup.third_party_keys());

    tracing::info!(
        account_id = %request.account_id,
        lineup = %lineup_row.public_id,
        items = lineup.entries.len(),
        owner_position = lineup.owner_position,
        "preview lineup persisted"
    );
    Ok(PreviewOutcome {
        lineup_row,
        lineup,
        session_id,
        suggested,
        unresolved,
    })
}
