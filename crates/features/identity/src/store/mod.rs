//! Persistence collaborators of the identity slice.
//!
//! The registrar only talks to these traits; the `memory` implementations back the default
//! server and the tests.

mod memory;

pub use memory::{MemoryAccountStore, MemoryRoleStore, MemorySettingsStore};

use async_trait::async_trait;
use shub_domain::config::AdvancedSettings;
use shub_domain::records::{AccountRecord, NewAccount, RoleRecord};
use std::borrow::Cow;
use std::fmt::Debug;

#[shub_derive::shub_error]
pub enum StoreError {
    /// A uniqueness rule was violated on write.
    #[error("Duplicate record{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Accounts whose `email` or `username` equals any of `identifiers`, ignoring case.
///
/// `provider: None` searches every provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub identifiers: Vec<String>,
    pub provider: Option<String>,
}

impl AccountFilter {
    pub fn identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { identifiers: identifiers.into_iter().map(Into::into).collect(), provider: None }
    }

    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Whether `account` is selected by this filter.
    #[must_use]
    pub fn matches(&self, account: &AccountRecord) -> bool {
        if self.provider.as_ref().is_some_and(|provider| *provider != account.provider) {
            return false;
        }

        let email = account.email.to_lowercase();
        let username = account.username.to_lowercase();
        self.identifiers.iter().map(|identifier| identifier.to_lowercase()).any(|identifier| {
            identifier == email || identifier == username
        })
    }
}

/// Runtime settings keyed by name (`"advanced"`).
#[async_trait]
pub trait SettingsStore: Debug + Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<AdvancedSettings>, StoreError>;

    async fn set(&self, key: &str, settings: AdvancedSettings) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RoleStore: Debug + Send + Sync {
    /// The role whose `type` equals `kind`.
    async fn find_one(&self, kind: &str) -> Result<Option<RoleRecord>, StoreError>;
}

#[async_trait]
pub trait AccountStore: Debug + Send + Sync {
    async fn count(&self, filter: &AccountFilter) -> Result<u64, StoreError>;

    /// Persists a new account, hashing its password.
    ///
    /// Implementations report identifier collisions as [`StoreError::Duplicate`].
    async fn create(&self, account: NewAccount) -> Result<AccountRecord, StoreError>;

    /// The local-provider account whose email or username equals `identifier`, ignoring case.
    async fn find_local(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn verify_password(
        &self,
        account: &AccountRecord,
        password: &str,
    ) -> Result<bool, StoreError>;
}
