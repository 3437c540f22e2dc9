use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Metadata source (YouTube Data API).
    pub youtube_api_key: String,
    pub youtube_timeout_secs: u64,
    pub videos_per_channel: u32,
    pub lookback_days: i64,
    pub longform_min_secs: i32,
    pub shorts_max_secs: i32,

    // Transcript actor.
    pub transcript_api_key: Option<String>,
    pub transcript_timeout_secs: u64,

    // Identifier resolver.
    pub resolver_timeout_secs: u64,
    pub resolver_user_agent: String,
    pub resolver_batch_width: usize,

    // Research fan-out sources.
    pub trend_api_key: Option<String>,
    pub verify_api_key: Option<String>,
    pub scrape_api_key: Option<String>,
    pub source_timeout_secs: u64,
    pub trend_retries: u32,
    pub verify_retries: u32,
    pub scrape_retries: u32,
    pub trend_result_limit: usize,
    pub max_scrape_urls: usize,

    // LLM delegates.
    pub delegate_api_key: Option<String>,
    pub synthesizer_model: String,
    pub generator_model: String,
    pub corpus_path: PathBuf,

    // Pipeline.
    pub suggested_channels: usize,
    pub free_tier_test_limit: i32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("youtube_api_key", &"[redacted]")
            .field("youtube_timeout_secs", &self.youtube_timeout_secs)
            .field("videos_per_channel", &self.videos_per_channel)
            .field("lookback_days", &self.lookback_days)
            .field("longform_min_secs", &self.longform_min_secs)
            .field("shorts_max_secs", &self.shorts_max_secs)
            .field(
                "transcript_api_key",
                &self.transcript_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("transcript_timeout_secs", &self.transcript_timeout_secs)
            .field("resolver_timeout_secs", &self.resolver_timeout_secs)
            .field("resolver_user_agent", &self.resolver_user_agent)
            .field("resolver_batch_width", &self.resolver_batch_width)
            .field(
                "trend_api_key",
                &self.trend_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "verify_api_key",
                &self.verify_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "scrape_api_key",
                &self.scrape_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("trend_retries", &self.trend_retries)
            .field("verify_retries", &self.verify_retries)
            .field("scrape_retries", &self.scrape_retries)
            .field("trend_result_limit", &self.trend_result_limit)
            .field("max_scrape_urls", &self.max_scrape_urls)
            .field(
                "delegate_api_key",
                &self.delegate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("synthesizer_model", &self.synthesizer_model)
            .field("generator_model", &self.generator_model)
            .field("corpus_path", &self.corpus_path)
            .field("suggested_channels", &self.suggested_channels)
            .field("free_tier_test_limit", &self.free_tier_test_limit)
            .finish()
    }
}
