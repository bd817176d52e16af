#![cfg(feature = "server")]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use shub_kernel::domain::config::ApiConfig;
use shub_kernel::domain::registry::{FeatureSlice, InitializedSlice};
use shub_kernel::server::router::system_router;
use shub_kernel::server::{ApiState, ApiStateError};
use std::any::Any;
use tower::ServiceExt;

#[derive(Debug)]
struct Catalog {
    name: &'static str,
}

impl FeatureSlice for Catalog {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Unregistered;

impl FeatureSlice for Unregistered {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn slices_are_fetched_by_type() {
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .register_slice(InitializedSlice::new(Catalog { name: "catalog" }))
        .build()
        .expect("state builds");

    assert_eq!(state.get_slice::<Catalog>().map(|c| c.name), Some("catalog"));
    assert_eq!(state.slice_ids().count(), 1);

    let err = state.try_get_slice::<Unregistered>().unwrap_err();
    assert!(matches!(err, ApiStateError::MissingSlice { .. }));
}

#[test]
fn build_requires_config() {
    let err = ApiState::builder().build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));
}

#[tokio::test]
async fn health_endpoint_reports_up_without_caching() {
    let (router, _doc) = system_router::<()>().split_for_parts();

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store, no-cache, must-revalidate")
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["status"], "up");
    assert!(json["uptime"].is_u64());
}
