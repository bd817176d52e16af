//! Request checks for local authentication.
//!
//! Registration runs these gates in order: [`check_phone`], [`check_allowed_fields`],
//! [`project`] and [`validate_register_body`]. The other local-auth bodies are checked by the
//! `validate_*_body` functions, which share the password rules of registration.

mod bodies;
mod policy;

pub use bodies::{
    CallbackBody, ChangePasswordBody, EmailConfirmationBody, ForgotPasswordBody,
    ResetPasswordBody, SendEmailConfirmationBody, validate_callback_body,
    validate_change_password_body, validate_email_confirmation_body,
    validate_forgot_password_body, validate_reset_password_body,
    validate_send_email_confirmation_body,
};
pub use policy::{PasswordPolicy, PatternPolicy, PolicyError};

use crate::error::IdentityError;
use regex::Regex;
use serde_json::{Map, Value};
use shub_domain::constants::LOCAL_PROVIDER;
use std::sync::LazyLock;

/// Fields every registration may carry regardless of configuration.
pub const ALWAYS_ALLOWED: [&str; 3] = ["username", "password", "email"];

/// Longest accepted password, in UTF-8 bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+[0-9] [0-9]{3} [0-9]{3} [0-9]{2} [0-9]{2}$").expect("phone pattern compiles")
});

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Registration input after schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterBody {
    pub email: String,
    pub username: String,
    pub password: String,
    /// Allow-listed pass-through fields, in submission order.
    pub extra: Map<String, Value>,
}

/// `+D DDD DDD DD DD`: a plus sign, then digit groups of 1, 3, 3, 2 and 2 separated by single
/// spaces.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Requires a well-formed `phone`. Missing and falsy values (`null`, `false`, `0`, `""`) are
/// "required" failures; anything else that is not a matching string is a format failure.
pub fn check_phone(value: Option<&Value>) -> Result<(), IdentityError> {
    match value {
        None => Err(IdentityError::validation("phone required")),
        Some(value) if is_falsy(value) => Err(IdentityError::validation("phone required")),
        Some(Value::String(phone)) if is_valid_phone(phone) => Ok(()),
        Some(_) => Err(IdentityError::validation("phone format invalid")),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() < f64::MIN_POSITIVE),
        _ => false,
    }
}

/// Keys of `body` accepted by neither [`ALWAYS_ALLOWED`] nor `allowed_fields`, in encounter order.
#[must_use]
pub fn offending_keys<'a>(body: &'a Map<String, Value>, allowed_fields: &[String]) -> Vec<&'a str> {
    unknown_keys(body, |key| {
        ALWAYS_ALLOWED.contains(&key) || allowed_fields.iter().any(|field| field == key)
    })
}

/// Rejects any key outside the allow-list. `phone` is not implicitly allowed.
pub fn check_allowed_fields(
    body: &Map<String, Value>,
    allowed_fields: &[String],
) -> Result<(), IdentityError> {
    reject_keys(&offending_keys(body, allowed_fields))
}

/// Keeps the allow-listed keys and tags the result with the local provider.
#[must_use]
pub fn project(mut body: Map<String, Value>, allowed_fields: &[String]) -> Map<String, Value> {
    body.retain(|key, _| {
        ALWAYS_ALLOWED.contains(&key.as_str()) || allowed_fields.iter().any(|field| field == key)
    });
    body.insert("provider".to_owned(), Value::String(LOCAL_PROVIDER.to_owned()));
    body
}

/// Checks `email`, `username` and `password` in that order, stopping at the first failure.
///
/// Every other key except `provider` is passed through untouched.
pub async fn validate_register_body(
    mut params: Map<String, Value>,
    policy: Option<&dyn PasswordPolicy>,
) -> Result<RegisterBody, IdentityError> {
    let email = required_email(&params, "email")?.to_owned();
    let username = required_str(&params, "username")?.to_owned();
    let password = required_str(&params, "password")?.to_owned();
    check_password(&password, policy).await?;

    for field in ALWAYS_ALLOWED.iter().chain(&["provider"]) {
        params.shift_remove(*field);
    }

    Ok(RegisterBody { email, username, password, extra: params })
}

/// Length limit first, then the optional policy.
pub async fn check_password(
    password: &str,
    policy: Option<&dyn PasswordPolicy>,
) -> Result<(), IdentityError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(IdentityError::validation("password too long"));
    }

    if let Some(policy) = policy {
        match policy.validate(password).await {
            Ok(true) => {},
            Ok(false) => return Err(IdentityError::validation("password validation failed")),
            Err(err) => return Err(IdentityError::validation(err.to_string())),
        }
    }

    Ok(())
}

pub(crate) fn required_str<'a>(
    body: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, IdentityError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(IdentityError::validation(format!("{field} required"))),
        Some(Value::String(value)) if value.is_empty() => {
            Err(IdentityError::validation(format!("{field} required")))
        },
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(IdentityError::validation(format!("{field} must be a string"))),
    }
}

pub(crate) fn required_email<'a>(
    body: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, IdentityError> {
    let email = required_str(body, field)?;
    if is_valid_email(email) {
        Ok(email)
    } else {
        Err(IdentityError::validation(format!("{field} format invalid")))
    }
}

pub(crate) fn unknown_keys<'a>(
    body: &'a Map<String, Value>,
    known: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    body.keys().map(String::as_str).filter(|key| !known(key)).collect()
}

pub(crate) fn reject_keys(keys: &[&str]) -> Result<(), IdentityError> {
    if keys.is_empty() {
        Ok(())
    } else {
        Err(IdentityError::validation(format!("invalid parameters: {}", keys.join(", "))))
    }
}
