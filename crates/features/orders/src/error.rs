use std::borrow::Cow;

/// A specialized [`OrdersError`] enum of this crate.
#[shub_derive::shub_error]
pub enum OrdersError {
    #[error("Unauthorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Order validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal orders error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl OrdersError {
    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self::Unauthorized { message: Cow::Borrowed("user not authenticated"), context: None }
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::OrdersError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use shub_kernel::server::{ErrorBody, INTERNAL_MESSAGE};

    impl IntoResponse for OrdersError {
        fn into_response(self) -> Response {
            let (status, name, message) = match &self {
                Self::Unauthorized { message, .. } => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized", message.to_string())
                },
                Self::Validation { message, .. } => {
                    (StatusCode::BAD_REQUEST, "ValidationFailed", message.to_string())
                },
                Self::Internal { .. } => {
                    tracing::error!(error = %self, "Orders request failed");
                    let message = INTERNAL_MESSAGE.to_owned();
                    (StatusCode::INTERNAL_SERVER_ERROR, "InternalFailure", message)
                },
            };

            ErrorBody::new(status, name, message).into_response_with(status)
        }
    }
}
