use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use shub::domain::config::{ApiConfig, SslConfig};
use shub_server::Server;
use tower::ServiceExt;

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn json_post(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    request.body(Body::from(body.to_owned())).expect("request")
}

#[tokio::test]
async fn registers_and_places_an_order() {
    let server = Server::builder().build().expect("server");
    let app = server.router();

    let (status, health) =
        send(&app, Request::get("/health").body(Body::empty()).expect("request")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "up");

    let (status, registered) = send(
        &app,
        json_post(
            "/api/auth/local/register",
            None,
            r#"{"email":"b@x.com","username":"b","password":"secret1","phone":"+4 987 654 32 10"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let jwt = registered["jwt"].as_str().expect("jwt");

    let (status, order) =
        send(&app, json_post("/api/orders", Some(jwt), r#"{"data":{"sku":"A-1"}}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["user"], registered["user"]["id"]);
    assert_eq!(order["sku"], "A-1");
}

#[tokio::test]
async fn missing_certificates_fail_the_build() {
    let mut cfg = ApiConfig::default();
    cfg.server.ssl = Some(SslConfig {
        cert: "/nonexistent/cert.pem".into(),
        key: "/nonexistent/key.pem".into(),
    });

    let err = Server::builder().config(cfg).build().unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}

#[test]
fn invalid_password_pattern_fails_bootstrap() {
    let mut cfg = ApiConfig::default();
    cfg.identity.registration.password_pattern = Some("(".to_owned());

    assert!(Server::builder().config(cfg).build().is_err());
}
