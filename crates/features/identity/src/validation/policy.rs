use async_trait::async_trait;
use regex::Regex;
use std::borrow::Cow;
use std::fmt::Debug;

/// Failure raised by a [`PasswordPolicy`]; its message is shown to the client as-is.
#[shub_derive::shub_error]
pub enum PolicyError {
    #[error("{message}")]
    Rejected { message: Cow<'static, str> },
}

/// Extra password rule checked after the length limit.
///
/// `Ok(false)` rejects with a generic message, `Err` rejects with the error's message.
#[async_trait]
pub trait PasswordPolicy: Debug + Send + Sync {
    async fn validate(&self, password: &str) -> Result<bool, PolicyError>;
}

/// Requires every password to match a regular expression.
#[derive(Debug, Clone)]
pub struct PatternPolicy {
    pattern: Regex,
}

impl PatternPolicy {
    /// # Errors
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(pattern)? })
    }
}

#[async_trait]
impl PasswordPolicy for PatternPolicy {
    async fn validate(&self, password: &str) -> Result<bool, PolicyError> {
        Ok(self.pattern.is_match(password))
    }
}
