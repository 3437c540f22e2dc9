//! Source fan-out orchestration.
//!
//! Trend search and verification run in parallel; scrape targets derive from
//! the trend hits and run as a secondary fan-out through a bounded pool,
//! capped to bound latency and cost. Every call is individually wrapped with
//! its timeout and configured retry count, and failures degrade to absent
//! bundle slots. Only the all-sources-failed case errors.

mod scrape;
mod trends;
mod verify;

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};

pub use scrape::ScrapeClient;
pub use trends::TrendSearchClient;
pub use verify::VerificationClient;

use crate::error::ResearchError;
use crate::retry::retry_source;
use crate::types::{ResearchBundle, ScrapedPage, TrendHit};

/// The three source clients the orchestrator fans out to.
pub struct ResearchClients {
    pub trends: TrendSearchClient,
    pub verify: VerificationClient,
    pub scrape: ScrapeClient,
}

/// Per-round knobs: timeouts, retry counts, and fan-out caps.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub source_timeout_secs: u64,
    pub trend_retries: u32,
    pub verify_retries: u32,
    pub scrape_retries: u32,
    pub retry_backoff_ms: u64,
    /// How many trend hits to request.
    pub trend_result_limit: usize,
    /// Upper bound on secondary scrape fan-out.
    pub max_scrape_urls: usize,
    /// Worker-pool width for the scrape fan-out.
    pub scrape_concurrency: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: 20,
            trend_retries: 0,
            verify_retries: 1,
            scrape_retries: 0,
            retry_backoff_ms: 500,
            trend_result_limit: 10,
            max_scrape_urls: 5,
            scrape_concurrency: 3,
        }
    }
}

/// What to research: a topic plus optional claims to verify.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    pub topic: String,
    pub niche: String,
    pub claims: Vec<String>,
}

/// Fans out to all sources and assembles the bundle.
///
/// # Errors
///
/// Returns [`ResearchError::AllSourcesFailed`] only when no source
/// populated; any partial population is a success.
pub async fn gather(
    clients: &ResearchClients,
    config: &ResearchConfig,
    request: &ResearchRequest,
) -> Result<ResearchBundle, ResearchError> {
    let timeout = Duration::from_secs(config.source_timeout_secs);
    let trend_query = format!(
        "trending topics about {} in {}",
        request.topic, request.niche
    );

    // Primary fan-out: trend search and verification in parallel, each
    // isolated behind its own timeout and retry budget.
    let trends_call = bounded_source("trends", timeout, config.source_timeout_secs, || {
        retry_source("trends", config.trend_retries, config.retry_backoff_ms, || {
            clients.trends.search(&trend_query, config.trend_result_limit)
        })
    });
    let verify_call = bounded_source("verification", timeout, config.source_timeout_secs, || {
        retry_source(
            "verification",
            config.verify_retries,
            config.retry_backoff_ms,
            || clients.verify.verify(&request.topic, &request.claims),
        )
    });

    let (trends_result, verify_result) = tokio::join!(trends_call, verify_call);

    let trends = match trends_result {
        Ok(hits) => {
            tracing::debug!(topic = %request.topic, count = hits.len(), "collected trend hits");
            Some(hits)
        }
        Err(e) => {
            tracing::warn!(topic = %request.topic, source = "trends", error = %e, "trend search failed");
            None
        }
    };

    let verification = match verify_result {
        Ok(check) => {
            tracing::debug!(
                topic = %request.topic,
                chars = check.verification.len(),
                "collected verification"
            );
            Some(check)
        }
        Err(e) => {
            tracing::warn!(topic = %request.topic, source = "verification", error = %e, "verification failed");
            None
        }
    };

    // Secondary fan-out: scrape the URLs the trend source surfaced, capped
    // and individually isolated just like the primaries.
    let pages = match &trends {
        Some(hits) => scrape_top_urls(clients, config, hits).await,
        None => None,
    };

    let bundle = ResearchBundle {
        topic: request.topic.clone(),
        trends,
        verification,
        pages,
    };

    if !bundle.has_any_source() {
        return Err(ResearchError::AllSourcesFailed {
            topic: request.topic.clone(),
        });
    }

    tracing::info!(
        topic = %request.topic,
        sources = ?bundle.sources_used(),
        missing = ?bundle.missing_sources(),
        "research gathered"
    );
    Ok(bundle)
}

async fn scrape_top_urls(
    clients: &ResearchClients,
    config: &ResearchConfig,
    hits: &[TrendHit],
) -> Option<Vec<ScrapedPage>> {
    let targets: Vec<&str> = hits
        .iter()
        .map(|hit| hit.url.as_str())
        .take(config.max_scrape_urls)
        .collect();
    if targets.is_empty() {
        return None;
    }

    let timeout = Duration::from_secs(config.source_timeout_secs);
    let pages: Vec<ScrapedPage> = stream::iter(targets)
        .map(|target| {
            let timeout_secs = config.source_timeout_secs;
            async move {
                let result = bounded_source("scrape", timeout, timeout_secs, || {
                    retry_source("scrape", config.scrape_retries, config.retry_backoff_ms, || {
                        clients.scrape.scrape(target)
                    })
                })
                .await;
                match result {
                    Ok(page) => Some(page),
                    Err(e) => {
                        tracing::warn!(url = target, source = "scrape", error = %e, "page scrape failed");
                        None
                    }
                }
            }
        })
        .buffer_unordered(config.scrape_concurrency.max(1))
        .filter_map(std::future::ready)
        .collect()
        .await;

    if pages.is_empty() {
        None
    } else {
        Some(pages)
    }
}

/// Wraps one source call with its deadline; exceeding it is that unit's
/// failure, not a global abort.
async fn bounded_source<T, F, Fut>(
    source: &'static str,
    timeout: Duration,
    timeout_secs: u64,
    operation: F,
) -> Result<T, ResearchError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ResearchError>>,
{
    match tokio::time::timeout(timeout, operation()).await {
        Ok(result) => result,
        Err(_) => Err(ResearchError::Timeout {
            source_name: source,
            timeout_secs,
        }),
    }
}

#[cfg(test)]
#[path = "gather_test.rs"]
mod tests;
