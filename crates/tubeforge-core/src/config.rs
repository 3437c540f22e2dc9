use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i32 = |var: &str, default: &str| -> Result<i32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let youtube_api_key = require("TUBEFORGE_YOUTUBE_API_KEY")?;

    let env = parse_environment(&or_default("TUBEFORGE_ENV", "development"));
    let log_level = or_default("TUBEFORGE_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("TUBEFORGE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TUBEFORGE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TUBEFORGE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let youtube_timeout_secs = parse_u64("TUBEFORGE_YOUTUBE_TIMEOUT_SECS", "10")?;
    let videos_per_channel = parse_u32("TUBEFORGE_VIDEOS_PER_CHANNEL", "5")?;
    let lookback_days = parse_i64("TUBEFORGE_LOOKBACK_DAYS", "365")?;
    let longform_min_secs = parse_i32("TUBEFORGE_LONGFORM_MIN_SECS", "300")?;
    let shorts_max_secs = parse_i32("TUBEFORGE_SHORTS_MAX_SECS", "60")?;

    let transcript_api_key = lookup("TUBEFORGE_TRANSCRIPT_API_KEY").ok();
    let transcript_timeout_secs = parse_u64("TUBEFORGE_TRANSCRIPT_TIMEOUT_SECS", "60")?;

    let resolver_timeout_secs = parse_u64("TUBEFORGE_RESOLVER_TIMEOUT_SECS", "10")?;
    let resolver_user_agent = or_default("TUBEFORGE_RESOLVER_USER_AGENT", "Mozilla/5.0");
    let resolver_batch_width = parse_usize("TUBEFORGE_RESOLVER_BATCH_WIDTH", "10")?;

    let trend_api_key = lookup("TUBEFORGE_TREND_API_KEY").ok();
    let verify_api_key = lookup("TUBEFORGE_VERIFY_API_KEY").ok();
    let scrape_api_key = lookup("TUBEFORGE_SCRAPE_API_KEY").ok();
    let source_timeout_secs = parse_u64("TUBEFORGE_SOURCE_TIMEOUT_SECS", "20")?;
    let trend_retries = parse_u32("TUBEFORGE_TREND_RETRIES", "0")?;
    let verify_retries = parse_u32("TUBEFORGE_VERIFY_RETRIES", "1")?;
    let scrape_retries = parse_u32("TUBEFORGE_SCRAPE_RETRIES", "0")?;
    let trend_result_limit = parse_usize("TUBEFORGE_TREND_RESULT_LIMIT", "10")?;
    let max_scrape_urls = parse_usize("TUBEFORGE_MAX_SCRAPE_URLS", "5")?;

    let delegate_api_key = lookup("TUBEFORGE_DELEGATE_API_KEY").ok();
    let synthesizer_model = or_default("TUBEFORGE_SYNTHESIZER_MODEL", "research-synth-flash");
    let generator_model = or_default("TUBEFORGE_GENERATOR_MODEL", "script-writer-large");
    let corpus_path = PathBuf::from(or_default("TUBEFORGE_CORPUS_PATH", "./data/corpus.json"));

    let suggested_channels = parse_usize("TUBEFORGE_SUGGESTED_CHANNELS", "10")?;
    let free_tier_test_limit = parse_i32("TUBEFORGE_FREE_TIER_TEST_LIMIT", "5")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        youtube_api_key,
        youtube_timeout_secs,
        videos_per_channel,
        lookback_days,
        longform_min_secs,
        shorts_max_secs,
        transcript_api_key,
        transcript_timeout_secs,
        resolver_timeout_secs,
        resolver_user_agent,
        resolver_batch_width,
        trend_api_key,
        verify_api_key,
        scrape_api_key,
        source_timeout_secs,
        trend_retries,
        verify_retries,
        scrape_retries,
        trend_result_limit,
        max_scrape_urls,
        delegate_api_key,
        synthesizer_model,
        generator_model,
        corpus_path,
        suggested_channels,
        free_tier_test_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
