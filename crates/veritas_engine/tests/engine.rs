use std::sync::mpsc;
use std::time::Duration;

use veritas_engine::{ClientSettings, EngineEvent, EngineHandle, StreamError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    for _ in 0..300 {
        if let Ok(event) = rx.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("engine produced no event");
}

#[tokio::test]
async fn engine_runs_a_job_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crew/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "job_id": "abc123" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crew/stream/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            concat!(
                "event: log\ndata: {\"source\":\"Search-Tool\",\"type\":\"RUNNING\"}\n\n",
                "event: log\ndata: {\"source\":\"VERDICT AGENT\",\"type\":\"END\"}\n\n",
            ),
            "text/event-stream",
        ))
        .mount(&server)
        .await;
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

    let (engine, events) = EngineHandle::spawn(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("engine");

    engine.submit(1, "a claim long enough to matter");
    match next_event(&events).await {
        EngineEvent::Submitted { key, result } => {
            assert_eq!(key, 1);
            assert_eq!(result.as_deref(), Ok("abc123"));
        }
        other => panic!("unexpected {other:?}"),
    }

    engine.open_stream(1, "abc123");
    let mut kinds = Vec::new();
    loop {
        match next_event(&events).await {
            EngineEvent::Progress { key: 1, event } => kinds.push(event.kind),
            EngineEvent::StreamFailed { key: 1, error } => {
                assert_eq!(error, StreamError::Closed);
                break;
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(kinds, vec!["RUNNING".to_string(), "END".to_string()]);
    engine.close_stream(1);
    engine.close_stream(1);

    engine.fetch_result(1, "abc123");
    match next_event(&events).await {
        EngineEvent::ResultReady { key, result } => {
            assert_eq!(key, 1);
            let payload = result.expect("payload");
            assert_eq!(payload.verdict, "FAKE");
            assert_eq!(payload.confidence, 91.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}
