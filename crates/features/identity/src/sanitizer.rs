use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use shub_domain::records::AccountRecord;
use std::fmt::Debug;

/// Client-facing view of an account.
pub type SanitizedUser = Map<String, Value>;

/// Identity of the authenticated caller, resolved from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
}

/// Strips what the caller may not see from an account.
#[async_trait]
pub trait OutputSanitizer: Debug + Send + Sync {
    async fn sanitize(&self, account: &AccountRecord, auth: Option<&Caller>) -> SanitizedUser;
}

/// Drops `password` and the configured private fields; anonymous callers also lose `role`.
#[derive(Debug, Clone, Default)]
pub struct PrivateFieldSanitizer {
    private_fields: Vec<String>,
}

impl PrivateFieldSanitizer {
    #[must_use]
    pub const fn new(private_fields: Vec<String>) -> Self {
        Self { private_fields }
    }
}

#[async_trait]
impl OutputSanitizer for PrivateFieldSanitizer {
    async fn sanitize(&self, account: &AccountRecord, auth: Option<&Caller>) -> SanitizedUser {
        let mut user = Map::new();
        user.insert("id".to_owned(), account.id.clone().into());
        user.insert("username".to_owned(), account.username.clone().into());
        user.insert("email".to_owned(), account.email.clone().into());
        user.insert("provider".to_owned(), account.provider.clone().into());
        user.insert("confirmed".to_owned(), account.confirmed.into());
        user.insert("blocked".to_owned(), account.blocked.into());
        user.insert(
            "createdAt".to_owned(),
            account.created_at.to_rfc3339_opts(SecondsFormat::Millis, true).into(),
        );
        if auth.is_some() {
            user.insert("role".to_owned(), account.role.clone().into());
        }

        for (key, value) in &account.extra {
            if key != "password" && !user.contains_key(key) {
                user.insert(key.clone(), value.clone());
            }
        }

        user.retain(|key, _| !self.private_fields.contains(key));
        user
    }
}
