//! HTTP surface of the identity slice.

mod extract;
mod handlers;

pub use extract::MaybeCaller;
pub use handlers::{RegisterRequest, RegistrationResponse};

use shub_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/api/auth/local` and `/api/auth/local/register`.
pub fn identity_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::register_handler))
        .routes(routes!(handlers::login_handler))
}
