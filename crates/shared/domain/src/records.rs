//! Persisted entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user account as stored by the account store.
///
/// `password` holds the store's hash, never the submitted secret. `extra` carries the
/// allow-listed registration fields (e.g. `phone`) and is flattened on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub confirmed: bool,
    pub blocked: bool,
    pub provider: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input of `AccountStore::create`; `password` is still plain text here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub confirmed: bool,
    pub provider: String,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// An order as returned by the order store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}
