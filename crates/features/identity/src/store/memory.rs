use super::{AccountFilter, AccountStore, RoleStore, SettingsStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use fxhash::FxHashMap;
use argon2::Argon2;
use parking_lot::RwLock;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use shub_domain::config::{AdvancedSettings, RoleSeed};
use shub_domain::constants::LOCAL_PROVIDER;
use shub_domain::records::{AccountRecord, NewAccount, RoleRecord};
use shub_kernel::safe_nanoid;

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    entries: RwLock<FxHashMap<String, AdvancedSettings>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn with(key: impl Into<String>, settings: AdvancedSettings) -> Self {
        let store = Self::default();
        store.entries.write().insert(key.into(), settings);
        store
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<AdvancedSettings>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, settings: AdvancedSettings) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_owned(), settings);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    roles: RwLock<Vec<RoleRecord>>,
}

impl MemoryRoleStore {
    /// Creates one role per seed, skipping seeds whose `type` is already taken.
    #[must_use]
    pub fn from_seeds(seeds: &[RoleSeed]) -> Self {
        let store = Self::default();
        for seed in seeds {
            store.insert(seed);
        }
        store
    }

    /// Adds a role unless one with the same `type` exists; returns the stored role.
    pub fn insert(&self, seed: &RoleSeed) -> RoleRecord {
        let mut roles = self.roles.write();
        if let Some(existing) = roles.iter().find(|role| role.kind == seed.kind) {
            return existing.clone();
        }

        let role = RoleRecord {
            id: safe_nanoid!(),
            name: seed.name.clone(),
            kind: seed.kind.clone(),
            description: seed.description.clone(),
        };
        roles.push(role.clone());
        role
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn find_one(&self, kind: &str) -> Result<Option<RoleRecord>, StoreError> {
        Ok(self.roles.read().iter().find(|role| role.kind == kind).cloned())
    }
}

/// Accounts kept in process memory with Argon2id password hashes (PHC strings).
///
/// Local-provider identifiers are unique: `create` re-checks them under the write lock.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<AccountRecord>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn count(&self, filter: &AccountFilter) -> Result<u64, StoreError> {
        let matched = self.accounts.read().iter().filter(|account| filter.matches(account)).count();
        Ok(u64::try_from(matched).unwrap_or(u64::MAX))
    }

    async fn create(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let mut accounts = self.accounts.write();

        if account.provider == LOCAL_PROVIDER {
            let filter = AccountFilter::identifiers([&account.email, &account.username])
                .provider(LOCAL_PROVIDER);
            if accounts.iter().any(|existing| filter.matches(existing)) {
                return Err(StoreError::Duplicate {
                    message: "email or username already taken".into(),
                    context: Some("creating account".into()),
                });
            }
        }

        let record = AccountRecord {
            id: safe_nanoid!(),
            password: hash_password(&account.password)?,
            email: account.email,
            username: account.username,
            role: account.role,
            confirmed: account.confirmed,
            blocked: false,
            provider: account.provider,
            created_at: Utc::now(),
            extra: account.extra,
        };

        accounts.push(record.clone());
        Ok(record)
    }

    async fn find_local(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError> {
        let filter = AccountFilter::identifiers([identifier]).provider(LOCAL_PROVIDER);
        Ok(self.accounts.read().iter().find(|account| filter.matches(account)).cloned())
    }

    async fn verify_password(
        &self,
        account: &AccountRecord,
        password: &str,
    ) -> Result<bool, StoreError> {
        let hash = PasswordHash::new(&account.password).map_err(|err| StoreError::Internal {
            message: format!("malformed password hash: {err}").into(),
            context: Some(account.id.clone().into()),
        })?;

        Ok(Argon2::default().verify_password(password.as_bytes(), &hash).is_ok())
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| StoreError::Internal {
            message: format!("hashing password: {err}").into(),
            context: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn local(email: &str, username: &str) -> NewAccount {
        NewAccount {
            email: email.to_owned(),
            username: username.to_owned(),
            password: "p1".to_owned(),
            role: "r1".to_owned(),
            confirmed: true,
            provider: LOCAL_PROVIDER.to_owned(),
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn create_hashes_and_verifies_passwords() {
        let store = MemoryAccountStore::default();
        let record = store.create(local("a@x.com", "a")).await.expect("created");

        assert!(record.password.starts_with("$argon2id$"));
        assert!(store.verify_password(&record, "p1").await.expect("verify"));
        assert!(!store.verify_password(&record, "p2").await.expect("verify"));
    }

    #[tokio::test]
    async fn account_ids_are_unambiguous_nanoids() {
        let store = MemoryAccountStore::default();
        let first = store.create(local("a@x.com", "a")).await.expect("created");
        let second = store.create(local("b@x.com", "b")).await.expect("created");

        for id in [&first.id, &second.id] {
            assert_eq!(id.len(), 12);
            assert!(id.chars().all(|ch| shub_kernel::SAFE_ALPHABET.contains(&ch)), "{id}");
        }
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn equal_passwords_get_distinct_salts() {
        let store = MemoryAccountStore::default();
        let first = store.create(local("a@x.com", "a")).await.expect("created");
        let second = store.create(local("b@x.com", "b")).await.expect("created");

        assert_ne!(first.password, second.password);
    }

    #[tokio::test]
    async fn malformed_hashes_are_internal_errors() {
        let store = MemoryAccountStore::default();
        let mut record = store.create(local("a@x.com", "a")).await.expect("created");
        record.password = "salt$deadbeef".to_owned();

        let err = store.verify_password(&record, "p1").await.unwrap_err();
        assert!(matches!(err, StoreError::Internal { .. }));
    }

    #[tokio::test]
    async fn local_identifiers_are_unique_across_fields() {
        let store = MemoryAccountStore::default();
        store.create(local("a@x.com", "alice")).await.expect("created");

        let err = store.create(local("ALICE", "someone")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let mut foreign = local("a@x.com", "alice");
        foreign.provider = "google".to_owned();
        store.create(foreign).await.expect("other providers are not checked");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn filters_scope_by_provider() {
        let store = MemoryAccountStore::default();
        let mut foreign = local("b@x.com", "b");
        foreign.provider = "github".to_owned();
        store.create(foreign).await.expect("created");

        let any = AccountFilter::identifiers(["B@X.com"]);
        assert_eq!(store.count(&any).await.expect("count"), 1);
        assert_eq!(store.count(&any.provider(LOCAL_PROVIDER)).await.expect("count"), 0);
        assert!(store.find_local("b").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn role_seeds_are_deduplicated() {
        let seed = RoleSeed {
            name: "Authenticated".to_owned(),
            kind: "authenticated".to_owned(),
            description: String::new(),
        };
        let store = MemoryRoleStore::from_seeds(&[seed.clone(), seed]);

        let role = store.find_one("authenticated").await.expect("lookup").expect("role");
        assert_eq!(role.id.len(), 12);
        assert_eq!(store.roles.read().len(), 1);
        assert!(store.find_one("admin").await.expect("lookup").is_none());
    }
}
