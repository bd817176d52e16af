use crate::Identity;
use crate::sanitizer::Caller;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shub_kernel::security::bearer_token;
use shub_kernel::server::ApiState;
use std::convert::Infallible;

/// The caller behind `Authorization: Bearer <jwt>`, if the token is valid.
///
/// Never rejects: a missing, malformed or expired token yields `MaybeCaller(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaybeCaller(pub Option<Caller>);

impl FromRequestParts<ApiState> for MaybeCaller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };
        let Some(identity) = state.get_slice::<Identity>() else {
            tracing::warn!("Identity slice is not registered; treating caller as anonymous");
            return Ok(Self(None));
        };

        Ok(Self(identity.registrar.caller(token).await))
    }
}
