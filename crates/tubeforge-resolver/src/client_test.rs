use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL_ID: &str = "UCX6OQ3DkcsbYNE6H8uQQuVA";
const OTHER_ID: &str = "UCY7PQ3DkcsbYNE6H8uQQuVB";

fn test_client(base_url: &str) -> ResolverClient {
    ResolverClient::with_base_url(5, "tubeforge-test/0.1", 10, base_url)
        .expect("client construction should not fail")
}

fn channel_page(channel_id: &str) -> String {
    format!(
        "<html><head>\
         <link rel=\"canonical\" href=\"https://www.youtube.com/channel/{channel_id}\">\
         </head><body></body></html>"
    )
}

#[tokio::test]
async fn resolve_extracts_id_from_channel_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@MrBeast"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_page(CHANNEL_ID)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client.resolve("@MrBeast").await.unwrap();
    assert_eq!(resolved.channel_id, CHANNEL_ID);
    assert_eq!(resolved.handle, "@MrBeast");
}

#[tokio::test]
async fn resolve_adds_missing_sigil_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@Veritasium"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_page(CHANNEL_ID)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client.resolve("Veritasium").await.unwrap();
    assert_eq!(resolved.handle, "@Veritasium");
}

#[tokio::test]
async fn resolve_short_circuits_canonical_ids_without_fetching() {
    // No mock server mounted at all: a fetch would error out.
    let client = test_client("http://127.0.0.1:9");
    let resolved = client.resolve(CHANNEL_ID).await.unwrap();
    assert_eq!(resolved.channel_id, CHANNEL_ID);
}

#[tokio::test]
async fn resolve_fails_when_no_strategy_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@nobody"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no ids here</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.resolve("@nobody").await;
    assert!(matches!(result, Err(ResolverError::NotResolvable { .. })));
}

#[tokio::test]
async fn resolve_fails_on_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.resolve("@gone").await;
    assert!(matches!(result, Err(ResolverError::NotResolvable { .. })));
}

#[tokio::test]
async fn batch_keeps_partial_results_and_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@ok1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_page(CHANNEL_ID)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/@bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/@ok2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_page(OTHER_ID)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let inputs = vec!["@ok1".to_string(), "@bad".to_string(), "@ok2".to_string()];
    let batch = client.resolve_batch(&inputs).await.unwrap();

    assert_eq!(batch.resolved.len(), 2);
    assert_eq!(batch.unresolved, vec!["@bad".to_string()]);
    // Caller-visible order matches input order.
    assert_eq!(batch.resolved[0].handle, "@ok1");
    assert_eq!(batch.resolved[0].channel_id, CHANNEL_ID);
    assert_eq!(batch.resolved[1].handle, "@ok2");
    assert_eq!(batch.resolved[1].channel_id, OTHER_ID);
}

#[tokio::test]
async fn batch_fails_only_when_nothing_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let inputs = vec!["@a".to_string(), "@b".to_string()];
    let result = client.resolve_batch(&inputs).await;
    assert!(
        matches!(result, Err(ResolverError::BatchUnresolvable { attempted: 2 })),
        "expected BatchUnresolvable, got: {result:?}"
    );
}
