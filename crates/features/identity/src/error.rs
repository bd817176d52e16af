use crate::store::StoreError;
use crate::token::TokenError;
use shub_domain::constants::INTERNAL_MESSAGE;
use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
///
/// `Validation`, `Conflict` and `Failure` messages are shown to clients verbatim; every
/// other variant is answered with a generic message and logged in full.
#[shub_derive::shub_error]
pub enum IdentityError {
    /// Registration is switched off in the advanced settings.
    #[error("Registration disabled{}", format_context(.context))]
    Disabled { context: Option<Cow<'static, str>> },

    #[error("Identity validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The submitted identifiers collide with an existing account.
    #[error("Identity conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Deployment or data defect, e.g. the default role is missing.
    #[error("Identity inconsistency{}: {message}", format_context(.context))]
    Inconsistency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A collaborator failed after the account was created.
    #[error("Identity failure{}: {message}", format_context(.context))]
    Failure { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Identity store error{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[error("Session token error{}: {source}", format_context(.context))]
    Token { source: TokenError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl IdentityError {
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }

    /// Error kind reported in the `name` field of the error body.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Disabled { .. } => "RegistrationDisabled",
            Self::Validation { .. } => "ValidationFailed",
            Self::Conflict { .. } => "Conflict",
            Self::Inconsistency { .. } => "InternalInconsistency",
            Self::Failure { .. }
            | Self::Store { .. }
            | Self::Token { .. }
            | Self::Internal { .. } => "InternalFailure",
        }
    }

    /// The message a client is allowed to see.
    #[must_use]
    pub fn public_message(&self) -> Cow<'static, str> {
        match self {
            Self::Disabled { .. } => Cow::Borrowed("Register action is currently disabled"),
            Self::Validation { message, .. }
            | Self::Conflict { message, .. }
            | Self::Failure { message, .. } => message.clone(),
            Self::Inconsistency { .. }
            | Self::Store { .. }
            | Self::Token { .. }
            | Self::Internal { .. } => Cow::Borrowed(INTERNAL_MESSAGE),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::IdentityError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use shub_kernel::server::ErrorBody;

    impl IdentityError {
        #[must_use]
        pub const fn status(&self) -> StatusCode {
            match self {
                Self::Disabled { .. } => StatusCode::FORBIDDEN,
                Self::Validation { .. } => StatusCode::BAD_REQUEST,
                Self::Conflict { .. } => StatusCode::CONFLICT,
                Self::Inconsistency { .. }
                | Self::Failure { .. }
                | Self::Store { .. }
                | Self::Token { .. }
                    | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for IdentityError {
        fn into_response(self) -> Response {
            let status = self.status();
            if status.is_server_error() {
                tracing::error!(error = %self, "Identity request failed");
            }

            ErrorBody::new(status, self.kind(), self.public_message()).into_response_with(status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_stay_private() {
        let err = IdentityError::Inconsistency {
            message: "default role not found".into(),
            context: Some("role lookup".into()),
        };

        assert_eq!(err.kind(), "InternalInconsistency");
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
        assert!(err.to_string().contains("default role not found"));
    }

    #[test]
    fn client_errors_are_verbatim() {
        let err = IdentityError::validation("phone required");
        assert_eq!(err.kind(), "ValidationFailed");
        assert_eq!(err.public_message(), "phone required");

        let err = IdentityError::Failure {
            message: "confirmation email send failed".into(),
            context: None,
        };
        assert_eq!(err.kind(), "InternalFailure");
        assert_eq!(err.public_message(), "confirmation email send failed");
    }
}
