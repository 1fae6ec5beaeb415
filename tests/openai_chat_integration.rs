//! End-to-end tests for the OpenAI provider and chat controller against
//! a mock SSE server.

use serde_json::{json, Value};

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waypoint::config::ProviderConfig;
use waypoint::controller::{ChatController, FailureKind, SubmitOutcome};
use waypoint::credentials::Credential;
use waypoint::prompts::SYSTEM_PROMPT;
use waypoint::providers;
use waypoint::session::Role;

/// Build an SSE body from content fragments, terminated by [DONE]
fn sse_body(fragments: &[&str]) -> Vec<u8> {
    let mut body = String::new();
    for fragment in fragments {
        let chunk = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body.into_bytes()
}

fn controller_for(server: &MockServer) -> ChatController {
    let config = ProviderConfig {
        api_base: server.uri(),
        ..Default::default()
    };
    let provider =
        providers::create_provider(config, Credential::new("sk-test").unwrap()).unwrap();
    ChatController::new(provider)
}

/// Streamed reply is rendered fragment by fragment and stored concatenated
#[tokio::test]
async fn test_streamed_reply_appends_assistant_turn() {
    let server = MockServer::start().await;

    let fragments = ["1. ", "도톤보리 ", "글리코 사인 앞 타코야키"];
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&fragments), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);

    let mut seen = Vec::new();
    let outcome = controller
        .submit("오사카 맛집 추천", |fragment| seen.push(fragment.to_string()))
        .await
        .unwrap();

    let expected_reply = fragments.concat();
    assert_eq!(seen, fragments);
    assert_eq!(outcome, SubmitOutcome::Reply(expected_reply.clone()));

    let turns = controller.session().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "오사카 맛집 추천");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, expected_reply);
}

/// The request payload always starts with the fixed system instruction
#[tokio::test]
async fn test_request_carries_system_prompt_first() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["ok"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.submit("제주도 여행지 추천", |_| {}).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["stream"], true);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
    assert_eq!(messages.last().unwrap()["role"], "user");
    assert_eq!(messages.last().unwrap()["content"], "제주도 여행지 추천");
}

/// A second submission resends the full history after the system prompt
#[tokio::test]
async fn test_multi_turn_payload_includes_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["reply"]), "text/event-stream"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.submit("first question", |_| {}).await.unwrap();
    controller.submit("second question", |_| {}).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = body["messages"].as_array().unwrap();

    // system + user/assistant from turn one + the new user turn
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "first question");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "reply");
    assert_eq!(messages[3]["content"], "second question");
}

/// A rejected credential leaves the user turn but no assistant turn
#[tokio::test]
async fn test_auth_rejection_leaves_user_turn_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let failure = controller.submit("부산 맛집", |_| {}).await.unwrap_err();

    assert_eq!(failure.kind, FailureKind::Authentication);
    assert!(failure.detail.contains("401"));

    let turns = controller.session().turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "부산 맛집");
}

/// Server-side errors are reported as service failures, not crashes
#[tokio::test]
async fn test_server_error_reports_service_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let failure = controller.submit("question", |_| {}).await.unwrap_err();

    assert_eq!(failure.kind, FailureKind::Service);
    assert!(failure.detail.contains("500"));
    assert_eq!(controller.session().len(), 1);
}

/// The user can retry after a failed turn; the failed turn stays visible
#[tokio::test]
async fn test_retry_after_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["recovered"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);

    let failure = controller.submit("서울 여행", |_| {}).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Service);
    assert_eq!(controller.session().len(), 1);

    let outcome = controller.submit("서울 여행 다시", |_| {}).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Reply("recovered".to_string()));

    // Both user turns and the one successful reply are in the transcript.
    assert_eq!(controller.session().len(), 3);

    // The second request payload still contains the failed turn.
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert!(contents.contains(&"서울 여행"));
}

/// Empty or whitespace-only input never reaches the server
#[tokio::test]
async fn test_empty_input_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["never"]), "text/event-stream"),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);

    for input in ["", "   ", "\n\t"] {
        let outcome = controller.submit(input, |_| {}).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Ignored);
    }

    assert!(controller.session().is_empty());
}

/// CRLF-delimited SSE bodies stream the same as LF-delimited ones
#[tokio::test]
async fn test_crlf_delimited_stream() {
    let server = MockServer::start().await;

    let mut body = String::new();
    for fragment in ["경주 ", "불국사"] {
        let chunk = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {}\r\n\r\n", chunk));
    }
    body.push_str("data: [DONE]\r\n\r\n");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);

    let mut seen = Vec::new();
    let outcome = controller
        .submit("경주 여행지 추천", |fragment| seen.push(fragment.to_string()))
        .await
        .unwrap();

    assert_eq!(seen, vec!["경주 ", "불국사"]);
    assert_eq!(outcome, SubmitOutcome::Reply("경주 불국사".to_string()));
}

/// Streams that omit [DONE] still produce the full concatenated reply
#[tokio::test]
async fn test_stream_without_done_marker() {
    let server = MockServer::start().await;

    let mut body = String::new();
    for fragment in ["partial ", "reply"] {
        let chunk = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {}\n\n", chunk));
    }

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let outcome = controller.submit("question", |_| {}).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Reply("partial reply".to_string()));
}
