use crate::error::{IdentityError, IdentityErrorExt};
use crate::registrar::Registrar;
use crate::sanitizer::{Caller, SanitizedUser};
use crate::validation::validate_callback_body;
use serde_json::{Map, Value};
use shub_derive::api_model;
use tracing::{debug, info};

const INVALID_CREDENTIALS: &str = "invalid identifier or password";

/// An authenticated session.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct Session {
    pub jwt: String,
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub user: SanitizedUser,
}

impl Registrar {
    /// Signs in a local account by email or username.
    ///
    /// Unknown identifiers and wrong passwords fail with the same message.
    pub async fn login(
        &self,
        body: &Map<String, Value>,
        auth: Option<&Caller>,
    ) -> Result<Session, IdentityError> {
        let credentials = validate_callback_body(body)?;
        let settings = self.advanced_settings().await?;

        let Some(account) =
            self.accounts.find_local(&credentials.identifier).await.context("finding account")?
        else {
            debug!("Login rejected: unknown identifier");
            return Err(IdentityError::validation(INVALID_CREDENTIALS));
        };

        if !self
            .accounts
            .verify_password(&account, &credentials.password)
            .await
            .context("verifying password")?
        {
            debug!(account_id = %account.id, "Login rejected: wrong password");
            return Err(IdentityError::validation(INVALID_CREDENTIALS));
        }

        if account.blocked {
            return Err(IdentityError::validation("account blocked"));
        }
        if settings.email_confirmation && !account.confirmed {
            return Err(IdentityError::validation("email not confirmed"));
        }

        let jwt = self.tokens.issue(&account.id).await.context("issuing session token")?;
        info!(account_id = %account.id, "Login succeeded");

        Ok(Session { jwt, user: self.sanitizer.sanitize(&account, auth).await })
    }

    /// Resolves a bearer token to its caller; `None` for any invalid token.
    pub async fn caller(&self, token: &str) -> Option<Caller> {
        match self.tokens.verify(token).await {
            Ok(claims) => Some(Caller { id: claims.sub }),
            Err(err) => {
                debug!(error = %err, "Ignoring invalid bearer token");
                None
            },
        }
    }
}
