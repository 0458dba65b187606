use std::time::Duration;

use pretty_assertions::assert_eq;
use veritas_engine::{
    ClientSettings, CrewApi, FetchError, ReqwestCrewClient, StreamError, SubmissionError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestCrewClient {
    ReqwestCrewClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
}

#[tokio::test]
async fn start_posts_claim_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crew/start"))
        .and(body_json(serde_json::json!({ "claim": "the moon is cheese" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "job_id": "abc123" })))
        .expect(1)
        .mount(&server)
        .await;

    let job_id = client_for(&server)
        .start("the moon is cheese")
        .await
        .expect("job id");
    assert_eq!(job_id, "abc123");
}

#[tokio::test]
async fn start_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crew/start"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).start("claim").await.unwrap_err();
    assert_eq!(err, SubmissionError::HttpStatus(503));
}

#[tokio::test]
async fn start_requires_job_id_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crew/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "queued" })))
        .mount(&server)
        .await;

    let err = client_for(&server).start("claim").await.unwrap_err();
    assert_eq!(err, SubmissionError::MissingJobId);
}

#[tokio::test]
async fn start_reports_unreachable_service() {
    let client = ReqwestCrewClient::new(ClientSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..ClientSettings::default()
    });
    let err = client.start("claim").await.unwrap_err();
    assert!(matches!(err, SubmissionError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn result_decodes_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crew/result/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "verdict": "FAKE",
            "confidence": 91,
            "reasoning": "...",
            "key_factors": { "source_credibility": 20 },
            "sources_analyzed": { "news": ["http://x"] }
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server).result("abc123").await.expect("payload");
    assert_eq!(payload.verdict, "FAKE");
    assert_eq!(payload.confidence, 91.0);
    assert_eq!(payload.key_factors.get("source_credibility"), Some(&20.0));
    assert_eq!(payload.sources_analyzed["news"], vec!["http://x".to_string()]);
}

#[tokio::test]
async fn result_errors_are_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crew/result/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crew/result/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.result("missing").await.unwrap_err(),
        FetchError::HttpStatus(404)
    );
    assert!(matches!(
        client.result("garbled").await.unwrap_err(),
        FetchError::Malformed(_)
    ));
}

#[tokio::test]
async fn stream_requests_event_stream_and_checks_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crew/stream/gone"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let err = client_for(&server).open_stream("gone").await.err().unwrap();
    assert_eq!(err, StreamError::HttpStatus(410));
}
