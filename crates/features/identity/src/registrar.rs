//! Local registration pipeline.
//!
//! Each step is a gate; the first failing gate ends the request:
//!
//! 1. registration enabled
//! 2. `phone` present and well-formed
//! 3. no keys outside the allow-list
//! 4. `email`, `username` and `password` rules
//! 5. default role exists
//! 6. no local account already uses the email or username (and, when unique emails are
//!    enforced, no account of any provider)
//! 7. account created, sanitized, then either a confirmation email or a session token

use crate::error::{IdentityError, IdentityErrorExt};
use crate::mailer::ConfirmationMailer;
use crate::sanitizer::{Caller, OutputSanitizer, SanitizedUser};
use crate::store::{AccountFilter, AccountStore, RoleStore, SettingsStore, StoreError};
use crate::token::TokenService;
use crate::validation::{self, PasswordPolicy};
use serde::Serialize;
use serde_json::{Map, Value};
use shub_domain::config::AdvancedSettings;
use shub_domain::constants::{ADVANCED_SETTINGS_KEY, AUTHENTICATED_ROLE, LOCAL_PROVIDER};
use shub_domain::records::NewAccount;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const IDENTIFIER_TAKEN: &str = "email or username already taken";

/// Rules applied to one registration request.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub allow_register: bool,
    /// Accepted on top of `username`, `password` and `email`.
    pub allowed_fields: Vec<String>,
    pub validate_password: Option<Arc<dyn PasswordPolicy>>,
    pub email_confirmation_required: bool,
    pub unique_email_required: bool,
    pub default_role_type: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            allow_register: true,
            allowed_fields: Vec::new(),
            validate_password: None,
            email_confirmation_required: false,
            unique_email_required: false,
            default_role_type: AUTHENTICATED_ROLE.to_owned(),
        }
    }
}

/// Successful registration: a session when no confirmation is needed, otherwise the pending user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistrationOutcome {
    Session { jwt: String, user: SanitizedUser },
    Pending { user: SanitizedUser },
}

impl RegistrationOutcome {
    #[must_use]
    pub const fn user(&self) -> &SanitizedUser {
        match self {
            Self::Session { user, .. } | Self::Pending { user } => user,
        }
    }

    #[must_use]
    pub fn jwt(&self) -> Option<&str> {
        match self {
            Self::Session { jwt, .. } => Some(jwt),
            Self::Pending { .. } => None,
        }
    }
}

/// Registration and login service wired with its collaborators.
#[derive(Debug, Clone)]
pub struct Registrar {
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) roles: Arc<dyn RoleStore>,
    pub(crate) accounts: Arc<dyn AccountStore>,
    pub(crate) mailer: Arc<dyn ConfirmationMailer>,
    pub(crate) tokens: Arc<dyn TokenService>,
    pub(crate) sanitizer: Arc<dyn OutputSanitizer>,
    allowed_fields: Vec<String>,
    password_policy: Option<Arc<dyn PasswordPolicy>>,
}

impl Registrar {
    #[must_use]
    pub fn builder() -> RegistrarBuilder {
        RegistrarBuilder::default()
    }

    /// Current advanced settings.
    pub async fn advanced_settings(&self) -> Result<AdvancedSettings, IdentityError> {
        self.settings
            .get(ADVANCED_SETTINGS_KEY)
            .await
            .context("reading advanced settings")?
            .ok_or_else(|| IdentityError::Inconsistency {
                message: "advanced settings not found".into(),
                context: None,
            })
    }

    /// Per-request rules: the static allow-list and policy plus the current settings.
    #[must_use]
    pub fn config_for(&self, settings: &AdvancedSettings) -> RegistrationConfig {
        RegistrationConfig {
            allow_register: settings.allow_register,
            allowed_fields: self.allowed_fields.clone(),
            validate_password: self.password_policy.clone(),
            email_confirmation_required: settings.email_confirmation,
            unique_email_required: settings.unique_email,
            default_role_type: settings.default_role.clone(),
        }
    }

    /// Registers with the rules currently in the settings store.
    pub async fn register(
        &self,
        body: Map<String, Value>,
        auth: Option<&Caller>,
    ) -> Result<RegistrationOutcome, IdentityError> {
        let settings = self.advanced_settings().await?;
        let config = self.config_for(&settings);
        self.register_with(body, &config, auth).await
    }

    /// Runs the pipeline against explicit rules.
    pub async fn register_with(
        &self,
        body: Map<String, Value>,
        config: &RegistrationConfig,
        auth: Option<&Caller>,
    ) -> Result<RegistrationOutcome, IdentityError> {
        if !config.allow_register {
            debug!("Registration rejected: disabled");
            return Err(IdentityError::Disabled { context: None });
        }

        validation::check_phone(body.get("phone")).inspect_err(rejected)?;
        validation::check_allowed_fields(&body, &config.allowed_fields).inspect_err(rejected)?;

        let params = validation::project(body, &config.allowed_fields);
        let input =
            validation::validate_register_body(params, config.validate_password.as_deref())
                .await
                .inspect_err(rejected)?;

        let role = self
            .roles
            .find_one(&config.default_role_type)
            .await
            .context("looking up default role")?
            .ok_or_else(|| {
                error!(role = %config.default_role_type, "Default role is missing");
                IdentityError::Inconsistency {
                    message: "default role not found".into(),
                    context: Some(config.default_role_type.clone().into()),
                }
            })?;

        let email = input.email.to_lowercase();
        let identifiers = AccountFilter::identifiers([&email, &input.username]);

        let local = identifiers.clone().provider(LOCAL_PROVIDER);
        if self.accounts.count(&local).await.context("checking local identifiers")? > 0 {
            debug!("Registration rejected: identifier taken");
            return Err(IdentityError::conflict(IDENTIFIER_TAKEN));
        }

        if config.unique_email_required
            && self.accounts.count(&identifiers).await.context("checking all identifiers")? > 0
        {
            debug!("Registration rejected: identifier taken by another provider");
            return Err(IdentityError::conflict(IDENTIFIER_TAKEN));
        }

        let account = self
            .accounts
            .create(NewAccount {
                email,
                username: input.username,
                password: input.password,
                role: role.id,
                confirmed: !config.email_confirmation_required,
                provider: LOCAL_PROVIDER.to_owned(),
                extra: input.extra,
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate { .. } => {
                    debug!("Registration rejected: identifier taken on create");
                    IdentityError::conflict(IDENTIFIER_TAKEN)
                },
                other => {
                    IdentityError::Store { source: other, context: Some("creating account".into()) }
                },
            })?;

        info!(account_id = %account.id, confirmed = account.confirmed, "Account registered");

        let user = self.sanitizer.sanitize(&account, auth).await;

        if config.email_confirmation_required {
            if let Err(err) = self.mailer.send_confirmation(&user).await {
                error!(account_id = %account.id, error = %err, "Sending confirmation email failed");
                return Err(IdentityError::Failure {
                    message: "confirmation email send failed".into(),
                    context: None,
                });
            }
            return Ok(RegistrationOutcome::Pending { user });
        }

        let jwt = self.tokens.issue(&account.id).await.context("issuing session token")?;
        info!(account_id = %account.id, "Session token issued");

        Ok(RegistrationOutcome::Session { jwt, user })
    }
}

fn rejected(err: &IdentityError) {
    warn!(reason = %err.public_message(), "Registration rejected");
}

#[derive(Debug, Default)]
pub struct RegistrarBuilder {
    settings: Option<Arc<dyn SettingsStore>>,
    roles: Option<Arc<dyn RoleStore>>,
    accounts: Option<Arc<dyn AccountStore>>,
    mailer: Option<Arc<dyn ConfirmationMailer>>,
    tokens: Option<Arc<dyn TokenService>>,
    sanitizer: Option<Arc<dyn OutputSanitizer>>,
    allowed_fields: Vec<String>,
    password_policy: Option<Arc<dyn PasswordPolicy>>,
}

impl RegistrarBuilder {
    #[must_use]
    pub fn settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: Arc<dyn RoleStore>) -> Self {
        self.roles = Some(roles);
        self
    }

    #[must_use]
    pub fn accounts(mut self, accounts: Arc<dyn AccountStore>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    #[must_use]
    pub fn mailer(mut self, mailer: Arc<dyn ConfirmationMailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    #[must_use]
    pub fn tokens(mut self, tokens: Arc<dyn TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    #[must_use]
    pub fn sanitizer(mut self, sanitizer: Arc<dyn OutputSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    #[must_use]
    pub fn allowed_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn password_policy(mut self, policy: Arc<dyn PasswordPolicy>) -> Self {
        self.password_policy = Some(policy);
        self
    }

    /// # Errors
    /// Returns [`IdentityError::Internal`] naming the first missing collaborator.
    pub fn build(self) -> Result<Registrar, IdentityError> {
        Ok(Registrar {
            settings: self.settings.ok_or("settings store not provided")?,
            roles: self.roles.ok_or("role store not provided")?,
            accounts: self.accounts.ok_or("account store not provided")?,
            mailer: self.mailer.ok_or("confirmation mailer not provided")?,
            tokens: self.tokens.ok_or("token service not provided")?,
            sanitizer: self.sanitizer.ok_or("output sanitizer not provided")?,
            allowed_fields: self.allowed_fields,
            password_policy: self.password_policy,
        })
    }
}
