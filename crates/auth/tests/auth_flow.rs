//! End-to-end authentication flow against a mock backend.

use std::time::Duration;

use frontdesk_auth::{AuthController, AuthError, GuardDecision, Navigator, Route, RouteGuard};
use frontdesk_config::ApiConfig;
use frontdesk_gateway::ApiClient;
use frontdesk_session::{load, MemoryTokenStore, SessionStatus};
use httpmock::prelude::*;
use serde_json::json;

struct Harness {
    controller: AuthController,
    tokens: MemoryTokenStore,
    navigator: Navigator,
}

impl Harness {
    fn new(server: &MockServer, tokens: MemoryTokenStore) -> Self {
        let (session, writer) = load(tokens.clone());
        let config = ApiConfig {
            base_url: server.url("/api"),
            request_timeout_seconds: 2,
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config, session).expect("client");
        let navigator = Navigator::new(Route::Dashboard);
        Self {
            controller: AuthController::new(client, writer, navigator.clone()),
            tokens,
            navigator,
        }
    }

    fn guard(&self) -> RouteGuard {
        RouteGuard::new(&self.controller.session(), self.navigator.clone())
    }
}

#[tokio::test]
async fn no_persisted_token_redirects_without_verifying() {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(200).json_body(json!({"user": {"_id": "u1"}}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::default());
    let mut guard = harness.guard();

    assert_eq!(
        harness.controller.verify_once().await,
        SessionStatus::Unauthenticated
    );
    assert_eq!(
        guard.settle(&Route::Dashboard).await,
        GuardDecision::Redirect {
            to: Route::Login,
            replace: true
        }
    );
    assert_eq!(harness.navigator.current(), Route::Login);
    assert_eq!(harness.navigator.back(), None);
    assert_eq!(me.hits_async().await, 0);
}

#[tokio::test]
async fn valid_persisted_token_renders_protected_content() {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/protected")
                .header("authorization", "Bearer T1");
            then.status(200)
                .json_body(json!({"user": {"_id": "u1", "name": "Front Desk"}}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));
    let mut guard = harness.guard();
    assert_eq!(guard.evaluate(&Route::Guests), GuardDecision::Loading);

    let (decision, status) = tokio::join!(
        guard.settle(&Route::Guests),
        harness.controller.verify_once()
    );

    assert_eq!(status, SessionStatus::Authenticated);
    assert_eq!(decision, GuardDecision::Render(Route::Guests));
    assert_eq!(harness.navigator.current(), Route::Dashboard);
    assert_eq!(
        harness.controller.current_user().and_then(|u| u.name),
        Some("Front Desk".to_string())
    );
    me.assert_async().await;
}

#[tokio::test]
async fn rejected_persisted_token_is_removed_and_redirects() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(401).json_body(json!({"error": "Token has expired!"}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("stale"));
    let mut guard = harness.guard();

    assert_eq!(
        harness.controller.verify_once().await,
        SessionStatus::Unauthenticated
    );
    assert_eq!(harness.tokens.peek(), None);
    assert_eq!(
        guard.settle(&Route::Bookings).await,
        GuardDecision::Redirect {
            to: Route::Login,
            replace: true
        }
    );
}

#[tokio::test]
async fn verify_is_issued_once_for_concurrent_callers() {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(200)
                .delay(Duration::from_millis(50))
                .json_body(json!({"user": {"_id": "u1"}}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));
    let controller = &harness.controller;

    let (a, b, c) = tokio::join!(
        controller.verify_once(),
        controller.verify_once(),
        controller.verify_once()
    );
    assert_eq!([a, b, c], [SessionStatus::Authenticated; 3]);

    controller.verify_once().await;
    assert_eq!(me.hits_async().await, 1);
}

#[tokio::test]
async fn login_sets_session_and_later_calls_carry_the_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"email": "a@b.com", "password": "secret"}));
            then.status(200)
                .json_body(json!({"token": "T1", "user": {"id": 1, "name": "A"}}));
        })
        .await;
    let guests = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/guests")
                .header("authorization", "Bearer T1");
            then.status(200).json_body(json!([]));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::default());
    let user = harness
        .controller
        .login("a@b.com", "secret")
        .await
        .expect("login");

    let session = harness.controller.session().current();
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert_eq!(session.token(), Some("T1"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("1"));
    assert_eq!(user.name.as_deref(), Some("A"));
    assert_eq!(harness.tokens.peek().as_deref(), Some("T1"));

    harness.controller.client().guests().await.expect("guests");
    guests.assert_async().await;
}

#[tokio::test]
async fn failed_login_leaves_the_session_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401).json_body(json!({"error": "Invalid password"}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::default());
    let before = harness.controller.session().current();

    let error = harness
        .controller
        .login("a@b.com", "wrong")
        .await
        .expect_err("401 expected");

    assert!(matches!(error, AuthError::InvalidCredentials));
    assert_eq!(error.user_message(), "Invalid email or password");
    assert_eq!(harness.controller.session().current(), before);
    assert_eq!(harness.tokens.peek(), None);
}

#[tokio::test]
async fn registration_does_not_sign_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/register");
            then.status(201).json_body(json!({
                "message": "User registered successfully",
                "user": {"_id": "u2", "name": "B", "email": "b@c.com"}
            }));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::default());
    let user = harness
        .controller
        .register("B", "b@c.com", "pw")
        .await
        .expect("register");

    assert_eq!(user.id.as_str(), "u2");
    assert!(!harness.controller.is_authenticated());
}

#[tokio::test]
async fn duplicate_registration_surfaces_the_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/register");
            then.status(400).json_body(json!({"error": "Email already exists"}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::default());
    let error = harness
        .controller
        .register("B", "b@c.com", "pw")
        .await
        .expect_err("400 expected");

    assert_eq!(error.user_message(), "Email already exists");
}

#[tokio::test]
async fn logout_is_idempotent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(200).json_body(json!({"user": {"_id": "u1"}}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));
    harness.controller.verify_once().await;
    harness.navigator.push(Route::Rooms);

    harness.controller.logout();
    let once = (
        harness.controller.session().current(),
        harness.navigator.history(),
        harness.tokens.peek(),
    );

    harness.controller.logout();
    let twice = (
        harness.controller.session().current(),
        harness.navigator.history(),
        harness.tokens.peek(),
    );

    assert_eq!(once, twice);
    assert_eq!(once.1, vec![Route::Dashboard, Route::Login]);
    assert_eq!(once.2, None);
}

#[tokio::test]
async fn expired_session_mid_use_redirects_to_login() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(200).json_body(json!({"user": {"_id": "u1"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/rooms");
            then.status(401).json_body(json!({"error": "Token has expired!"}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));
    harness.controller.verify_once().await;
    harness.navigator.push(Route::Rooms);
    let mut guard = harness.guard();
    assert_eq!(
        guard.evaluate(&Route::Rooms),
        GuardDecision::Render(Route::Rooms)
    );

    let error = harness
        .controller
        .client()
        .rooms()
        .await
        .expect_err("401 expected");
    assert!(harness.controller.handle_api_error(&error));

    assert_eq!(
        guard.next_decision().await,
        Some(GuardDecision::Redirect {
            to: Route::Login,
            replace: true
        })
    );
    assert_eq!(harness.navigator.current(), Route::Login);
    assert_eq!(harness.controller.session().status(), SessionStatus::Unauthenticated);
    assert_eq!(harness.tokens.peek(), None);
}

#[tokio::test]
async fn other_errors_do_not_sign_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/protected");
            then.status(200).json_body(json!({"user": {"_id": "u1"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/guests");
            then.status(500).json_body(json!({"error": "boom"}));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));
    harness.controller.verify_once().await;

    let error = harness
        .controller
        .client()
        .guests()
        .await
        .expect_err("500 expected");
    assert!(!harness.controller.handle_api_error(&error));
    assert!(harness.controller.is_authenticated());
}

#[tokio::test]
async fn default_verify_route_accepts_the_greeting_envelope() {
    let server = MockServer::start_async().await;
    let protected = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/protected")
                .header("authorization", "Bearer T1");
            then.status(200).json_body(json!({
                "message": "Hello A",
                "user": {"_id": "u1", "name": "A", "email": "a@b.com"}
            }));
        })
        .await;

    let harness = Harness::new(&server, MemoryTokenStore::with_token("T1"));

    assert_eq!(
        harness.controller.verify_once().await,
        SessionStatus::Authenticated
    );
    assert_eq!(harness.tokens.peek().as_deref(), Some("T1"));
    assert_eq!(
        harness.controller.current_user().map(|user| user.id.to_string()),
        Some("u1".to_string())
    );
    protected.assert_async().await;
}
