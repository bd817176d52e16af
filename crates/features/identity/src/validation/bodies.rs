//! Validators for the remaining local-auth bodies.
//!
//! Only [`validate_callback_body`] backs a route (login); the others are library entry points
//! for hosts that mount the confirmation and password-reset flows themselves.

use super::{
    PasswordPolicy, check_password, reject_keys, required_email, required_str, unknown_keys,
};
use crate::error::IdentityError;
use serde_json::{Map, Value};
use shub_derive::api_model;

/// Login credentials. `identifier` is an email or a username.
#[api_model(deny_unknown_fields = false)]
pub struct CallbackBody {
    pub identifier: String,
    pub password: String,
}

#[api_model(deny_unknown_fields = false)]
pub struct SendEmailConfirmationBody {
    pub email: String,
}

#[api_model(deny_unknown_fields = false)]
pub struct EmailConfirmationBody {
    pub confirmation: String,
}

#[api_model]
pub struct ForgotPasswordBody {
    pub email: String,
}

#[api_model]
pub struct ResetPasswordBody {
    pub password: String,
    pub password_confirmation: String,
    pub code: String,
}

#[api_model]
pub struct ChangePasswordBody {
    pub password: String,
    pub password_confirmation: String,
    pub current_password: String,
}

pub fn validate_callback_body(body: &Map<String, Value>) -> Result<CallbackBody, IdentityError> {
    Ok(CallbackBody {
        identifier: required_str(body, "identifier")?.to_owned(),
        password: required_str(body, "password")?.to_owned(),
    })
}

pub fn validate_send_email_confirmation_body(
    body: &Map<String, Value>,
) -> Result<SendEmailConfirmationBody, IdentityError> {
    Ok(SendEmailConfirmationBody { email: required_email(body, "email")?.to_owned() })
}

pub fn validate_email_confirmation_body(
    body: &Map<String, Value>,
) -> Result<EmailConfirmationBody, IdentityError> {
    Ok(EmailConfirmationBody { confirmation: required_str(body, "confirmation")?.to_owned() })
}

pub fn validate_forgot_password_body(
    body: &Map<String, Value>,
) -> Result<ForgotPasswordBody, IdentityError> {
    reject_keys(&unknown_keys(body, |key| key == "email"))?;
    Ok(ForgotPasswordBody { email: required_email(body, "email")?.to_owned() })
}

pub async fn validate_reset_password_body(
    body: &Map<String, Value>,
    policy: Option<&dyn PasswordPolicy>,
) -> Result<ResetPasswordBody, IdentityError> {
    reject_keys(&unknown_keys(body, |key| {
        matches!(key, "password" | "passwordConfirmation" | "code")
    }))?;
    let (password, password_confirmation) = confirmed_password(body, policy).await?;

    Ok(ResetPasswordBody {
        password,
        password_confirmation,
        code: required_str(body, "code")?.to_owned(),
    })
}

pub async fn validate_change_password_body(
    body: &Map<String, Value>,
    policy: Option<&dyn PasswordPolicy>,
) -> Result<ChangePasswordBody, IdentityError> {
    reject_keys(&unknown_keys(body, |key| {
        matches!(key, "password" | "passwordConfirmation" | "currentPassword")
    }))?;
    let (password, password_confirmation) = confirmed_password(body, policy).await?;

    Ok(ChangePasswordBody {
        password,
        password_confirmation,
        current_password: required_str(body, "currentPassword")?.to_owned(),
    })
}

async fn confirmed_password(
    body: &Map<String, Value>,
    policy: Option<&dyn PasswordPolicy>,
) -> Result<(String, String), IdentityError> {
    let password = required_str(body, "password")?;
    check_password(password, policy).await?;

    let confirmation = required_str(body, "passwordConfirmation")?;
    if confirmation != password {
        return Err(IdentityError::validation("passwords do not match"));
    }

    Ok((password.to_owned(), confirmation.to_owned()))
}
