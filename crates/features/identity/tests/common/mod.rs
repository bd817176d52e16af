#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use shub_domain::config::{AdvancedSettings, IdentityConfig, JwtConfig};
use shub_domain::constants::ADVANCED_SETTINGS_KEY;
use shub_identity::mailer::{ConfirmationMailer, MailerError};
use shub_identity::sanitizer::{PrivateFieldSanitizer, SanitizedUser};
use shub_identity::store::{MemoryAccountStore, MemoryRoleStore, MemorySettingsStore};
use shub_identity::token::JwtTokenService;
use shub_identity::{Registrar, RegistrationConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const PHONE: &str = "+1 234 567 89 01";

/// Counts deliveries and optionally fails them like a rejecting SMTP relay.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: AtomicUsize,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self { sent: AtomicUsize::new(0), fail: true }
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send_confirmation(&self, _user: &SanitizedUser) -> Result<(), MailerError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailerError::Transport {
                message: "554 relay access denied".into(),
                context: Some("smtp.internal:25".into()),
            });
        }
        Ok(())
    }
}

pub struct Fixture {
    pub registrar: Registrar,
    pub accounts: Arc<MemoryAccountStore>,
    pub settings: Arc<MemorySettingsStore>,
    pub mailer: Arc<RecordingMailer>,
    pub tokens: Arc<JwtTokenService>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let identity = IdentityConfig::default();
        let accounts = Arc::new(MemoryAccountStore::default());
        let settings =
            Arc::new(MemorySettingsStore::with(ADVANCED_SETTINGS_KEY, AdvancedSettings::default()));
        let mailer = Arc::new(mailer);
        let tokens = Arc::new(JwtTokenService::new(&JwtConfig::default()).expect("tokens"));

        let registrar = Registrar::builder()
            .settings(settings.clone())
            .roles(Arc::new(MemoryRoleStore::from_seeds(&identity.roles)))
            .accounts(accounts.clone())
            .mailer(mailer.clone())
            .tokens(tokens.clone())
            .sanitizer(Arc::new(PrivateFieldSanitizer::default()))
            .allowed_fields(["phone"])
            .build()
            .expect("registrar");

        Self { registrar, accounts, settings, mailer, tokens }
    }
}

pub fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn config(allowed_fields: &[&str]) -> RegistrationConfig {
    RegistrationConfig {
        allowed_fields: allowed_fields.iter().map(|f| (*f).to_owned()).collect(),
        ..RegistrationConfig::default()
    }
}
