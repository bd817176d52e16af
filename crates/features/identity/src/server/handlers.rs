use super::MaybeCaller;
use crate::Identity;
use crate::error::IdentityError;
use crate::login::Session;
use crate::registrar::RegistrationOutcome;
use crate::validation::CallbackBody;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Map, Value};
use shub_derive::{api_handler, api_model};
use shub_domain::constants::AUTH_TAG;
use shub_kernel::server::{ApiState, ErrorBody};

/// Local registration payload. Extra keys are accepted when allow-listed.
#[api_model(deny_unknown_fields = false)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    /// `+D DDD DDD DD DD`
    pub phone: String,
}

/// `jwt` is omitted while the account awaits email confirmation.
#[api_model]
pub struct RegistrationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[schema(value_type = Object)]
    pub user: Map<String, Value>,
}

impl From<RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        match outcome {
            RegistrationOutcome::Session { jwt, user } => Self { jwt: Some(jwt), user },
            RegistrationOutcome::Pending { user } => Self { jwt: None, user },
        }
    }
}

fn identity(state: &ApiState) -> Result<&Identity, IdentityError> {
    state.try_get_slice::<Identity>().map_err(|err| IdentityError::from(err.to_string()))
}

fn object(
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Map<String, Value>, IdentityError> {
    body.map(|Json(map)| map).map_err(|rejection| IdentityError::validation(rejection.body_text()))
}

#[api_handler(
    post,
    path = "/api/auth/local/register",
    request_body = RegisterRequest,
    responses(
        (status = OK, description = "Account created", body = RegistrationResponse),
        (status = BAD_REQUEST, description = "Invalid registration data", body = ErrorBody),
        (status = FORBIDDEN, description = "Registration disabled", body = ErrorBody),
        (status = CONFLICT, description = "Email or username taken", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Server failure", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(super) async fn register_handler(
    State(state): State<ApiState>,
    MaybeCaller(caller): MaybeCaller,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, IdentityError> {
    let outcome = identity(&state)?.registrar.register(object(body)?, caller.as_ref()).await?;
    Ok(Json(outcome.into()))
}

#[api_handler(
    post,
    path = "/api/auth/local",
    request_body = CallbackBody,
    responses(
        (status = OK, description = "Signed in", body = Session),
        (status = BAD_REQUEST, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(super) async fn login_handler(
    State(state): State<ApiState>,
    MaybeCaller(caller): MaybeCaller,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Session>, IdentityError> {
    let session = identity(&state)?.registrar.login(&object(body)?, caller.as_ref()).await?;
    Ok(Json(session))
}
