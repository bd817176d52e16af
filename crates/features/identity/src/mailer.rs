use crate::sanitizer::SanitizedUser;
use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt::Debug;

#[shub_derive::shub_error]
pub enum MailerError {
    #[error("Mail transport error{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Delivers the account confirmation email.
#[async_trait]
pub trait ConfirmationMailer: Debug + Send + Sync {
    async fn send_confirmation(&self, user: &SanitizedUser) -> Result<(), MailerError>;
}

/// Mailer without a transport: records the request in the log and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_confirmation(&self, user: &SanitizedUser) -> Result<(), MailerError> {
        tracing::info!(
            user_id = user.get("id").and_then(|v| v.as_str()).unwrap_or_default(),
            email = user.get("email").and_then(|v| v.as_str()).unwrap_or_default(),
            "Confirmation email queued"
        );
        Ok(())
    }
}
