use axum::Router;
use shub::kernel::prelude::ApiState;
use shub::server::router::{identity_router, orders_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "StoreHub API"), modifiers(&BearerAuth))]
struct ApiDoc;

/// Declares the `bearer` scheme referenced by authenticated endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build(),
            ),
        );
    }
}

fn api_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(identity_router())
        .merge(orders_router())
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) =
        api_router().layer(TraceLayer::new_for_http()).with_state(state).split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_security_requirement_resolves() {
        let (_, doc) = api_router().split_for_parts();

        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("bearer"));
        assert!(doc.paths.paths.contains_key("/api/orders"));
        assert!(doc.paths.paths.contains_key("/api/auth/local/register"));
    }
}
