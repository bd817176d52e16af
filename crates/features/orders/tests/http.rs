#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shub_domain::config::ApiConfig;
use shub_identity::server::identity_router;
use shub_kernel::server::ApiState;
use shub_orders::server::orders_router;
use tower::ServiceExt;

fn app() -> Router {
    let cfg = ApiConfig::default();
    let identity = shub_identity::init(&cfg).expect("identity slice");
    let orders = shub_orders::init().expect("orders slice");
    let state = ApiState::builder()
        .config(cfg)
        .register_slices([identity, orders])
        .build()
        .expect("state");

    let (router, _doc) = identity_router().merge(orders_router()).split_for_parts();
    router.with_state(state)
}

async fn post(app: &Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = request.body(Body::from(body.to_owned())).expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(app: &Router) -> (String, String) {
    let (status, body) = post(
        app,
        "/api/auth/local/register",
        None,
        r#"{"email":"a@x.com","username":"a","password":"p1","phone":"+1 234 567 89 01"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let jwt = body["jwt"].as_str().expect("jwt").to_owned();
    let id = body["user"]["id"].as_str().expect("user id").to_owned();
    (jwt, id)
}

#[tokio::test]
async fn anonymous_order_is_unauthorized() {
    let app = app();

    let (status, body) = post(&app, "/api/orders", None, r#"{"data":{"total":10}}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"error": {"status": 401, "name": "Unauthorized", "message": "user not authenticated"}})
    );

    // A garbage token is treated as no token, even with a broken body.
    let (status, _) = post(&app, "/api/orders", Some("not-a-jwt"), "{").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_is_owned_by_the_caller() {
    let app = app();
    let (jwt, user_id) = register(&app).await;

    let (status, body) =
        post(&app, "/api/orders", Some(&jwt), r#"{"data":{"total":10,"user":"mallory"}}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], user_id.as_str());
    assert_eq!(body["total"], 10);
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn order_data_must_be_an_object() {
    let app = app();
    let (jwt, _) = register(&app).await;

    let (status, body) = post(&app, "/api/orders", Some(&jwt), r#"{"data":[1,2]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["name"], "ValidationFailed");

    let (status, body) = post(&app, "/api/orders", Some(&jwt), "{").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn store_assigned_fields_cannot_be_spoofed() {
    let app = app();
    let (jwt, user_id) = register(&app).await;

    let (status, body) = post(
        &app,
        "/api/orders",
        Some(&jwt),
        r#"{"data":{"id":"SPOOFED","createdAt":"1999-01-01","sku":"A-1"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["id"], "SPOOFED");
    assert_ne!(body["createdAt"], "1999-01-01");
    assert!(body["createdAt"].as_str().is_some_and(|at| at.starts_with("20")));
    assert_eq!(body["user"], user_id.as_str());
    assert_eq!(body["sku"], "A-1");
}
