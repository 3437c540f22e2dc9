//! Offline unit tests for tubeforge-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use tubeforge_db::{NewChannel, NewLineupEntry, NewVideo, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = tubeforge_core::AppConfig {
        database_url: "postgres://example".to_string(),
        env: tubeforge_core::Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        youtube_api_key: "key".to_string(),
        youtube_timeout_secs: 10,
        videos_per_channel: 5,
        lookback_days: 365,
        longform_min_secs: 300,
        shorts_max_secs: 60,
        transcript_api_key: None,
        transcript_timeout_secs: 60,
        resolver_timeout_secs: 10,
        resolver_user_agent: "ua".to_string(),
        resolver_batch_width: 10,
        trend_api_key: None,
        verify_api_key: None,
        scrape_api_key: None,
        source_timeout_secs: 20,
        trend_retries: 0,
        verify_retries: 1,
        scrape_retries: 0,
        trend_result_limit: 10,
        max_scrape_urls: 5,
        delegate_api_key: None,
        synthesizer_model: "synth".to_string(),
        generator_model: "gen".to_string(),
        corpus_path: PathBuf::from("./data/corpus.json"),
        suggested_channels: 10,
        free_tier_test_limit: 5,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_values() {
    let config = PoolConfig::default();
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.min_connections, 1);
    assert_eq!(config.acquire_timeout_secs, 10);
}

/// Compile-time smoke test: confirm the payload types have the expected
/// fields with the correct types. No database required.
#[test]
fn new_video_payload_has_expected_fields() {
    let video = NewVideo {
        video_id: "dQw4w9WgXcQ".to_string(),
        channel_id: "UCuAXFkgsw1L7xaCfnd5JJOw".to_string(),
        title: "Test Video".to_string(),
        thumbnail_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string(),
        view_count: Some(1_500_000),
        published_at: None,
        duration_seconds: Some(212),
    };
    assert_eq!(video.video_id, "dQw4w9WgXcQ");
    assert_eq!(video.view_count, Some(1_500_000));
}

#[test]
fn new_channel_payload_has_expected_fields() {
    let channel = NewChannel {
        channel_id: "UCuAXFkgsw1L7xaCfnd5JJOw".to_string(),
        handle: "@RickAstley".to_string(),
        name: Some("Rick Astley".to_string()),
        avatar_url: None,
        subscriber_count: Some(4_000_000),
    };
    assert_eq!(channel.handle, "@RickAstley");
    assert!(channel.avatar_url.is_none());
}

#[test]
fn lineup_entry_owner_carries_no_video_id() {
    let entry = NewLineupEntry {
        position: 3,
        video_id: None,
        is_owner: true,
    };
    assert!(entry.is_owner);
    assert!(entry.video_id.is_none());
}
