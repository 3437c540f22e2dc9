//! The generation-run state machine.
//!
//! `Pending -> SourcesGathered(partial|full) -> Synthesized(fallback|normal)
//! -> Generated(fallback|normal) -> Persisted`. A run enters `Pending` only
//! after the quota gate commits; from then on every stage degrades rather
//! than halts, and the run always persists some result. Only persistence
//! itself can still fail, as an infrastructure error.

use sqlx::PgPool;
use uuid::Uuid;

use tubeforge_db::{get_video, insert_generation_run, GenerationRunRow, NewGenerationRun};
use tubeforge_research::{
    extract_claims, gather, ResearchBundle, ResearchClients, ResearchConfig, ResearchRequest,
    ResearchError,
};
use tubeforge_studio::{
    Angle, Generator, ProfileContext, SynthesisInput, SynthesizedBrief, Synthesizer, VideoContext,
};

use crate::error::PipelineError;
use crate::quota::QuotaGate;

const MAX_CLAIMS: usize = 5;

/// Stages a run passes through, recorded for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    SourcesGathered { partial: bool },
    Synthesized { fallback: bool },
    Generated { fallback: bool },
    Persisted,
}

/// Everything [`execute_generation_run`] needs.
pub struct GenerationDeps {
    pub pool: PgPool,
    pub gate: QuotaGate,
    pub research: ResearchClients,
    pub research_config: ResearchConfig,
    pub synthesizer: Synthesizer,
    pub generator: Generator,
}

/// The persisted run plus the state trail it took.
#[derive(Debug)]
pub struct RunOutcome {
    pub row: GenerationRunRow,
    pub states: Vec<RunState>,
}

/// Runs the full pipeline for one cached video and selected angle.
///
/// # Errors
///
/// - [`PipelineError::QuotaExceeded`] before anything is committed.
/// - [`PipelineError::VideoNotCached`] / [`PipelineError::TranscriptMissing`]
///   when prerequisites are absent.
/// - [`PipelineError::Db`] if the final persistence fails.
pub async fn execute_generation_run(
    deps: &GenerationDeps,
    account_id: Uuid,
    video_id: &str,
    angle: &Angle,
    profile: &ProfileContext,
) -> Result<RunOutcome, PipelineError> {
    // Prerequisites are checked before the gate so a doomed request does
    // not burn a quota unit.
    let video_row = get_video(&deps.pool, video_id)
        .await?
        .ok_or_else(|| PipelineError::VideoNotCached {
            video_id: video_id.to_string(),
        })?;
    let transcript =
        video_row
            .transcript
            .clone()
            .ok_or_else(|| PipelineError::TranscriptMissing {
                video_id: video_id.to_string(),
            })?;

    deps.gate.try_acquire(account_id).await?;

    let mut states = vec![RunState::Pending];
    tracing::info!(%account_id, video_id, "generation run admitted");

    let video = VideoContext {
        video_id: video_row.video_id.clone(),
        title: video_row.title.clone(),
        view_count: video_row.view_count,
        transcript,
    };

    // Research fan-out. Quota is committed, so even total source failure
    // degrades to an empty bundle rather than aborting the run.
    let claims = extract_claims(&video.transcript, MAX_CLAIMS);
    let request = ResearchRequest {
        topic: video.title.clone(),
        niche: profile.niche.clone(),
        claims,
    };
    let bundle = match gather(&deps.research, &deps.research_config, &request).await {
        Ok(bundle) => bundle,
        Err(ResearchError::AllSourcesFailed { .. }) => {
            tracing::warn!(video_id, "all research sources failed — continuing with empty bundle");
            ResearchBundle::empty(&video.title)
        }
        Err(e) => {
            // gather() only fails with AllSourcesFailed today; treat anything
            // else the same way rather than aborting a committed run.
            tracing::warn!(video_id, error = %e, "research failed — continuing with empty bundle");
            ResearchBundle::empty(&video.title)
        }
    };
    states.push(RunState::SourcesGathered {
        partial: !bundle.missing_sources().is_empty(),
    });

    let brief = deps
        .synthesizer
        .synthesize(&SynthesisInput {
            video: &video,
            angle,
            bundle: &bundle,
            profile,
        })
        .await;
    states.push(RunState::Synthesized {
        fallback: brief.origin.is_fallback(),
    });

    let package = deps.generator.generate(&video, angle, &brief, profile).await;
    states.push(RunState::Generated {
        fallback: package.origin.is_fallback(),
    });

    let row = persist(&deps.pool, account_id, &video, angle, &bundle, &brief, &package).await?;
    states.push(RunState::Persisted);

    tracing::info!(
        %account_id,
        video_id,
        run = %row.public_id,
        brief_origin = %row.brief_origin,
        script_origin = %row.script_origin,
        "generation run persisted"
    );
    Ok(RunOutcome { row, states })
}

async fn persist(
    pool: &PgPool,
    account_id: Uuid,
    video: &VideoContext,
    angle: &Angle,
    bundle: &ResearchBundle,
    brief: &SynthesizedBrief,
    package: &tubeforge_studio::ScriptPackage,
) -> Result<GenerationRunRow, PipelineError> {
    let run = NewGenerationRun {
        account_id,
        video_id: video.video_id.clone(),
        angle: serde_json::to_value(angle).unwrap_or_default(),
        brief: serde_json::to_value(brief).unwrap_or_default(),
        brief_origin: brief.origin.as_str().to_string(),
        script: package.script.clone(),
        titles: serde_json::to_value(&package.titles).unwrap_or_default(),
        thumbnails: serde_json::to_value(&package.thumbnails).unwrap_or_default(),
        script_origin: package.origin.as_str().to_string(),
        sources_used: serde_json::to_value(bundle.sources_used()).unwrap_or_default(),
    };

    Ok(insert_generation_run(pool, &run).await?)
}
