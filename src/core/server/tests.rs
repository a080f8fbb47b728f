use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::Service;

use crate::auth::JwtConfig;
use crate::core::{Config, ServerState, build_app};
use crate::db::DbService;
use crate::notify::EventPublisher;
use crate::notify::email::{Mailer, SmtpConfig};
use crate::notify::pusher::PusherConfig;
use crate::payments::{PaymentGateway, PaymentIntent, RefundOutcome};
use crate::utils::{AppError, AppResult};

struct NullGateway;

#[async_trait]
impl PaymentGateway for NullGateway {
    async fn create_intent(
        &self,
        _amount_cents: i64,
        _currency: &str,
        _metadata: &[(&str, String)],
    ) -> AppResult<PaymentIntent> {
        Err(AppError::upstream("gateway not wired in this test"))
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        Err(AppError::upstream(format!("no intent {intent_id}")))
    }

    async fn refund(&self, _intent_id: &str) -> AppResult<RefundOutcome> {
        Ok(RefundOutcome::Refunded)
    }

    async fn search_intents(&self, _key: &str, _value: &str) -> AppResult<Vec<PaymentIntent>> {
        Ok(vec![])
    }
}

struct NullPublisher;

#[async_trait]
impl EventPublisher for NullPublisher {
    async fn publish(
        &self,
        _channel: &str,
        _event: &str,
        _payload: &serde_json::Value,
    ) -> AppResult<()> {
        Ok(())
    }

    fn authorize_channel(&self, _socket_id: &str, _channel: &str) -> AppResult<String> {
        Ok("test-key:signature".to_string())
    }
}

struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: String) -> AppResult<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/luxurystay-test".to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "test-secret-key-at-least-32-characters!".to_string(),
            expiration_minutes: 60,
            issuer: "luxurystay".to_string(),
            audience: "luxurystay-clients".to_string(),
        },
        environment: "test".to_string(),
        client_url: "http://localhost:5173".to_string(),
        stripe_secret_key: String::new(),
        pusher: PusherConfig {
            app_id: "0".to_string(),
            key: "k".to_string(),
            secret: "s".to_string(),
            cluster: "eu".to_string(),
        },
        smtp: SmtpConfig {
            server: "localhost".to_string(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            from_email: "noreply@test.local".to_string(),
            from_name: "Test".to_string(),
        },
    }
}

async fn test_app() -> axum::Router {
    let db = DbService::memory().await.expect("in-memory db");
    let state = ServerState::with_adapters(
        test_config(),
        db.db,
        Arc::new(NullGateway),
        Arc::new(NullPublisher),
        Arc::new(NullMailer),
    );
    build_app(state)
}

async fn send(
    app: &mut axum::Router,
    req: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.call(req).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn register(app: &mut axum::Router, username: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/register",
            serde_json::json!({
                "username": username,
                "email": email,
                "password": "hunter2222",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["data"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_and_room_listing_are_public() {
    let mut app = test_app().await;

    let (status, body) = send(&mut app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&mut app, get("/api/rooms")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let mut app = test_app().await;

    let (status, _) = send(&mut app, get("/api/notifications")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&mut app, get_with_token("/api/notifications", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_then_fetch_own_profile() {
    let mut app = test_app().await;
    let token = register(&mut app, "alice", "alice@example.com").await;

    let (status, body) = send(&mut app, get_with_token("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");
    // Self-registration never grants a staff role
    assert_eq!(body["data"]["role"], "guest");
}

#[tokio::test]
async fn guests_cannot_reach_staff_routes() {
    let mut app = test_app().await;
    let token = register(&mut app, "bob", "bob@example.com").await;

    let (status, _) = send(&mut app, get_with_token("/api/bookings", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&mut app, get_with_token("/api/reports/dashboard", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&mut app, get_with_token("/api/users", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let mut app = test_app().await;
    register(&mut app, "carol", "carol@example.com").await;

    let (status, _) = send(
        &mut app,
        post_json(
            "/api/auth/register",
            serde_json::json!({
                "username": "carol2",
                "email": "carol@example.com",
                "password": "hunter2222",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
