//! HTTP surface of the orders slice.

use crate::Orders;
use crate::error::OrdersError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;
use shub_derive::{api_handler, api_model};
use shub_domain::constants::ORDERS_TAG;
use shub_domain::records::OrderRecord;
use shub_identity::server::MaybeCaller;
use shub_kernel::server::{ApiState, ErrorBody};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model(deny_unknown_fields = false)]
pub struct CreateOrderRequest {
    /// Order fields; `user` is always replaced with the caller's id.
    #[serde(default)]
    pub data: Value,
}

#[api_handler(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = OK, description = "Created order", body = Value),
        (status = BAD_REQUEST, description = "Invalid order data", body = ErrorBody),
        (status = UNAUTHORIZED, description = "No authenticated caller", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = ORDERS_TAG,
)]
pub(crate) async fn create_order_handler(
    State(state): State<ApiState>,
    MaybeCaller(caller): MaybeCaller,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderRecord>, OrdersError> {
    let orders =
        state.try_get_slice::<Orders>().map_err(|err| OrdersError::from(err.to_string()))?;

    // Authentication is checked before the body so anonymous callers always see 401.
    let Some(caller) = caller else {
        return Err(OrdersError::unauthenticated());
    };
    let Json(request) = body.map_err(|rejection| OrdersError::validation(rejection.body_text()))?;

    let order = orders.controller.create(Some(&caller), request.data).await?;
    Ok(Json(order))
}

/// `/api/orders`.
pub fn orders_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(create_order_handler))
}
