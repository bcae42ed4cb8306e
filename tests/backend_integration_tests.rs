use mira::api::{
    ApiError, CONNECTIVITY_MESSAGE, GENERIC_DETAIL, HttpBackend, MoodBackend, OpaqueId, Role,
    RouteStyle, UserCheck, dispatch,
};
use mira::core::action::{Action, Effect, update};
use mira::core::mood::{MoodClass, descriptor};
use mira::core::questionnaire::{AnswerSet, TOTAL_QUESTIONS};
use mira::core::state::{App, Screen};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend(server: &MockServer, routes: RouteStyle) -> HttpBackend {
    HttpBackend::new(&server.uri(), routes).unwrap()
}

fn all_answers(code: char) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for q in 1..=TOTAL_QUESTIONS {
        answers.insert(q, code);
    }
    answers
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Runs every request an effect asks for, feeding results back through
/// `update` until nothing is left in flight.
async fn drive(app: &mut App, backend: &dyn MoodBackend, effect: Effect) {
    let mut pending = effect.into_list();
    while let Some(effect) = pending.pop() {
        if let Effect::Request(request) = effect {
            let action = dispatch(backend, request).await;
            pending.extend(update(app, action).into_list());
        }
    }
}

async fn act(app: &mut App, backend: &dyn MoodBackend, action: Action) {
    let effect = update(app, action);
    drive(app, backend, effect).await;
}

// ============================================================================
// Identity
// ============================================================================

#[tokio::test]
async fn test_check_user_flat_exists() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/check-user/alice", 200, json!({"exists": true})).await;

    let result = backend(&server, RouteStyle::Flat).check_user("alice").await;
    assert_eq!(result, Ok(UserCheck::Existing));
}

#[tokio::test]
async fn test_check_user_prefixed_action_signup() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/auth/check-user/bob",
        200,
        json!({"action": "signup"}),
    )
    .await;

    let result = backend(&server, RouteStyle::Prefixed).check_user("bob").await;
    assert_eq!(result, Ok(UserCheck::New));
}

#[tokio::test]
async fn test_check_user_exists_wins_over_action() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/check-user/carol",
        200,
        json!({"exists": false, "action": "login"}),
    )
    .await;

    let result = backend(&server, RouteStyle::Flat).check_user("carol").await;
    assert_eq!(result, Ok(UserCheck::New));
}

#[tokio::test]
async fn test_check_user_percent_encodes_username() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/check-user/ann%20marie", 200, json!({"exists": false})).await;

    let result = backend(&server, RouteStyle::Flat).check_user("ann marie").await;
    assert_eq!(result, Ok(UserCheck::New));
}

#[tokio::test]
async fn test_signup_and_login_post_username() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .and(body_json(json!({"username": "alice"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "User created", "username": "alice"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let flat = backend(&server, RouteStyle::Flat);
    let signup = flat.signup("alice").await.unwrap();
    assert_eq!(signup.message.as_deref(), Some("User created"));

    let prefixed = backend(&server, RouteStyle::Prefixed);
    let login = prefixed.login("alice").await.unwrap();
    assert_eq!(login.status.as_deref(), Some("ok"));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_string_detail_is_shown_verbatim() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/signup",
        400,
        json!({"detail": "Username already exists"}),
    )
    .await;

    let err = backend(&server, RouteStyle::Flat)
        .signup("alice")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Backend {
            status: 400,
            detail: "Username already exists".to_string()
        }
    );
    assert_eq!(err.user_message(), "Username already exists");
}

#[tokio::test]
async fn test_structured_detail_falls_back_to_generic() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/detect-mood",
        422,
        json!({"detail": [{"loc": ["body", "answers"], "msg": "field required"}]}),
    )
    .await;

    let err = backend(&server, RouteStyle::Flat)
        .detect_mood("alice", &all_answers('A'))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), GENERIC_DETAIL);
}

#[tokio::test]
async fn test_non_json_error_body_falls_back_to_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mood-history/alice"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = backend(&server, RouteStyle::Flat)
        .mood_history("alice")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 500, .. }));
    assert_eq!(err.user_message(), GENERIC_DETAIL);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Nothing listens on the discard port
    let backend = HttpBackend::new("http://127.0.0.1:9", RouteStyle::Flat).unwrap();
    let err = assert_err!(backend.check_user("alice").await);
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/check-user/alice", 200, json!({"unexpected": 1})).await;

    let err = backend(&server, RouteStyle::Flat)
        .check_user("alice")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
}

// ============================================================================
// Mood
// ============================================================================

#[tokio::test]
async fn test_detect_mood_sends_answer_map() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mood/detect"))
        .and(body_partial_json(json!({
            "username": "alice",
            "answers": {"q1": "B", "q10": "B"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "Neutral", "log_id": "m-7"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let verdict = backend(&server, RouteStyle::Prefixed)
        .detect_mood("alice", &all_answers('B'))
        .await
        .unwrap();
    assert_eq!(verdict.mood, "Neutral");
    assert_eq!(verdict.log_id, OpaqueId::Text("m-7".to_string()));
}

#[tokio::test]
async fn test_mood_history_keeps_backend_order() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/mood/history/alice",
        200,
        json!({"history": [
            {"id": 2, "mood": "Stressed", "created_at": "2024-01-16 09:00:00"},
            {"id": 1, "mood": "Happy/Calm", "created_at": "2024-01-15 10:30:00"}
        ]}),
    )
    .await;

    let history = backend(&server, RouteStyle::Prefixed)
        .mood_history("alice")
        .await
        .unwrap();
    let moods: Vec<&str> = history.iter().map(|e| e.mood.as_str()).collect();
    assert_eq!(moods, vec!["Stressed", "Happy/Calm"]);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_lifecycle_prefixed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/start"))
        .and(body_json(json!({"username": "alice", "mood_log_id": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 9,
            "mood": "Sad",
            "greeting": "I'm here with you."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_json(json!({"session_id": 9, "message": "rough day"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "Tell me more.", "message_id": 31})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/end/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ended"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server, RouteStyle::Prefixed);
    let id = OpaqueId::Number(42);
    let start = backend.start_chat("alice", &id).await.unwrap();
    assert_eq!(start.session_id, OpaqueId::Number(9));

    let reply = backend
        .send_message(&start.session_id, "rough day")
        .await
        .unwrap();
    assert_eq!(reply.response, "Tell me more.");

    assert_ok!(backend.end_chat(&start.session_id).await);
}

#[tokio::test]
async fn test_chat_history_and_sessions_flat() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/chat/history/9",
        200,
        json!({"messages": [
            {"role": "assistant", "content": "Hi", "created_at": "2024-01-15 10:30:00"},
            {"role": "user", "content": "Hello"}
        ]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/chat/sessions/alice",
        200,
        json!({"sessions": [
            {"id": 9, "mood_log_id": 42, "mood": "Sad", "started_at": "2024-01-15 10:30:00", "ended_at": null}
        ]}),
    )
    .await;

    let backend = backend(&server, RouteStyle::Flat);
    let transcript = backend.chat_history(&OpaqueId::Number(9)).await.unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::Assistant);
    assert_eq!(transcript[1].created_at, None);

    let sessions = backend.chat_sessions("alice").await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].mood_log_id, Some(OpaqueId::Number(42)));
    assert!(sessions[0].ended_at.is_none());
}

#[tokio::test]
async fn test_health_probe_both_layouts() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/", 200, json!({"status": "ok"})).await;
    mount_json(&server, "GET", "/api/health", 503, json!({"detail": "starting"})).await;

    assert_ok!(backend(&server, RouteStyle::Flat).health().await);
    let err = assert_err!(backend(&server, RouteStyle::Prefixed).health().await);
    assert_eq!(err.user_message(), "starting");
}

// ============================================================================
// End to end through the reducer
// ============================================================================

#[tokio::test]
async fn test_new_user_to_first_chat() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/check-user/alice", 200, json!({"exists": false})).await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .and(body_json(json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "User created"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "GET", "/mood-history/alice", 200, json!({"history": []})).await;
    Mock::given(method("POST"))
        .and(path("/detect-mood"))
        .and(body_partial_json(json!({"username": "alice", "answers": {"q1": "A"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "Happy/Calm", "log_id": 42})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/start"))
        .and(body_json(json!({"username": "alice", "mood_log_id": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 5,
            "mood": "Happy/Calm",
            "greeting": "Great to see you, alice!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server, RouteStyle::Flat);
    let mut app = App::new(server.uri());

    // First Enter checks, second Enter signs up
    act(&mut app, &backend, Action::SubmitUsername("  alice ".to_string())).await;
    assert_eq!(app.screen, Screen::Login);
    act(&mut app, &backend, Action::SubmitUsername("alice".to_string())).await;
    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(app.username(), Some("alice"));

    act(&mut app, &backend, Action::StartQuestionnaire).await;
    for _ in 1..TOTAL_QUESTIONS {
        act(&mut app, &backend, Action::SelectOption('A')).await;
        act(&mut app, &backend, Action::NextQuestion).await;
    }
    act(&mut app, &backend, Action::SelectOption('A')).await;
    act(&mut app, &backend, Action::SubmitAnswers).await;

    assert_eq!(app.screen, Screen::Result);
    let verdict = app.verdict.clone().unwrap();
    assert_eq!(verdict.mood, "Happy/Calm");
    assert_eq!(verdict.log_id, OpaqueId::Number(42));
    assert_eq!(descriptor(&verdict.mood).class, MoodClass::Happy);

    act(&mut app, &backend, Action::StartChat).await;
    assert_eq!(app.screen, Screen::Chat);
    let chat = app.chat.as_ref().unwrap();
    assert_eq!(chat.id, OpaqueId::Number(5));
    assert_eq!(chat.transcript.len(), 1);
    assert_eq!(chat.transcript[0].role, Role::Assistant);
    assert_eq!(chat.transcript[0].content, "Great to see you, alice!");
}

#[tokio::test]
async fn test_failed_reply_appends_fallback() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/mood-history/alice", 200, json!({"history": []})).await;
    mount_json(
        &server,
        "GET",
        "/chat/sessions/alice",
        200,
        json!({"sessions": [{"id": 3, "mood": "Stressed"}]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/chat/history/3",
        200,
        json!({"messages": [{"role": "assistant", "content": "Welcome back."}]}),
    )
    .await;
    mount_json(&server, "POST", "/chat/message", 500, json!({"detail": "model offline"})).await;

    let backend = backend(&server, RouteStyle::Flat);
    let mut app = App::new(server.uri());
    act(&mut app, &backend, Action::RestoreIdentity("alice".to_string())).await;
    act(&mut app, &backend, Action::OpenSessions).await;

    let summary = app.sessions.loaded().unwrap()[0].clone();
    act(&mut app, &backend, Action::ResumeSession(summary)).await;
    assert_eq!(app.screen, Screen::Chat);

    act(&mut app, &backend, Action::SendMessage("hello".to_string())).await;
    let chat = app.chat.as_ref().unwrap();
    assert!(!chat.pending);
    assert_eq!(chat.transcript.len(), 3);
    assert_eq!(chat.transcript[1].content, "hello");
    assert_eq!(chat.transcript[2].role, Role::Assistant);
    assert_eq!(
        chat.transcript[2].content,
        mira::core::chat::FALLBACK_REPLY
    );
}
