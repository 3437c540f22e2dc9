use super::*;

use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, timeout_secs: u64) -> TranscriptClient {
    TranscriptClient::with_base_url("test-token", timeout_secs, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn joins_caption_segments_into_one_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/acts/.+/run-sync-get-dataset-items$"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"transcript": [{"text": "hello"}, {"text": "world"}]},
            {"transcript": [{"text": "again"}]}
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 10);
    let transcript = client.fetch_transcript("vid123", "en").await.unwrap();
    assert_eq!(transcript.as_deref(), Some("hello world again"));
}

#[tokio::test]
async fn missing_captions_are_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/acts/.+/run-sync-get-dataset-items$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 10);
    let transcript = client.fetch_transcript("vid123", "en").await.unwrap();
    assert_eq!(transcript, None);
}

#[tokio::test]
async fn slow_actor_run_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/acts/.+/run-sync-get-dataset-items$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 1);
    let result = client.fetch_transcript("vid123", "en").await;
    assert!(
        matches!(result, Err(YoutubeError::Timeout { timeout_secs: 1, .. })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/acts/.+/run-sync-get-dataset-items$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 10);
    let result = client.fetch_transcript("vid123", "en").await;
    assert!(matches!(
        result,
        Err(YoutubeError::UnexpectedStatus { status: 500, .. })
    ));
}
