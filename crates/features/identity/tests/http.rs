#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shub_domain::config::ApiConfig;
use shub_identity::server::identity_router;
use shub_kernel::server::ApiState;
use tower::ServiceExt;

fn app(cfg: ApiConfig) -> Router {
    let slice = shub_identity::init(&cfg).expect("identity slice");
    let state = ApiState::builder().config(cfg).register_slice(slice).build().expect("state");
    let (router, _doc) = identity_router().split_for_parts();
    router.with_state(state)
}

async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

const ALICE: &str =
    r#"{"email":"A@x.com","username":"a","password":"p1","phone":"+1 234 567 89 01"}"#;

#[tokio::test]
async fn register_then_conflict() {
    let app = app(ApiConfig::default());

    let (status, body) = post(&app, "/api/auth/local/register", ALICE).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jwt"].as_str().is_some_and(|jwt| !jwt.is_empty()));
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, body) = post(&app, "/api/auth/local/register", ALICE).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({"error": {
            "status": 409,
            "name": "Conflict",
            "message": "email or username already taken"
        }})
    );
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let app = app(ApiConfig::default());

    let (status, body) =
        post(&app, "/api/auth/local/register", r#"{"email":"a@x.com","username":"a"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["name"], "ValidationFailed");
    assert_eq!(body["error"]["message"], "phone required");

    let (status, body) = post(&app, "/api/auth/local/register", "[1, 2]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn disabled_registration_is_forbidden() {
    let mut cfg = ApiConfig::default();
    cfg.identity.advanced.allow_register = false;
    let app = app(cfg);

    let (status, body) = post(&app, "/api/auth/local/register", ALICE).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["name"], "RegistrationDisabled");
}

#[tokio::test]
async fn confirmation_pending_omits_the_token() {
    let mut cfg = ApiConfig::default();
    cfg.identity.advanced.email_confirmation = true;
    let app = app(cfg);

    let (status, body) = post(&app, "/api/auth/local/register", ALICE).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("jwt").is_none());
    assert_eq!(body["user"]["confirmed"], false);
}

#[tokio::test]
async fn missing_default_role_hides_details() {
    let mut cfg = ApiConfig::default();
    cfg.identity.roles.clear();
    let app = app(cfg);

    let (status, body) = post(&app, "/api/auth/local/register", ALICE).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["name"], "InternalInconsistency");
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn login_returns_a_session() {
    let app = app(ApiConfig::default());
    post(&app, "/api/auth/local/register", ALICE).await;

    let (status, body) =
        post(&app, "/api/auth/local", r#"{"identifier":"a@x.com","password":"p1"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jwt"].is_string());
    assert_eq!(body["user"]["username"], "a");

    let (status, body) =
        post(&app, "/api/auth/local", r#"{"identifier":"a@x.com","password":"p2"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "invalid identifier or password");
}
