use crate::constants::{AUTHENTICATED_ROLE, PUBLIC_ROLE};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub security: SecurityConfig,
    pub identity: IdentityConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Logging output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (`trace`..`error`), overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for rolling log files; console only when absent.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt: JwtConfig,
}

/// Session token signing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: Option<String>,
    pub ttl_seconds: u64,
}

/// Everything the identity slice reads at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub registration: RegistrationSettings,
    /// Initial value of the settings store.
    pub advanced: AdvancedSettings,
    /// Roles seeded into the role store.
    pub roles: Vec<RoleSeed>,
}

/// Static registration rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    /// Fields accepted on top of `username`, `password` and `email`.
    pub allowed_fields: Vec<String>,
    /// Optional regex every new password must match.
    pub password_pattern: Option<String>,
    /// Account fields never returned to clients (`password` is always hidden).
    pub private_fields: Vec<String>,
}

/// Runtime switches kept in the settings store under `"advanced"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    pub allow_register: bool,
    pub default_role: String,
    pub email_confirmation: bool,
    pub unique_email: bool,
}

/// A role created at startup when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "dev-only-change-me".to_owned(),
            issuer: "storehub".to_owned(),
            audience: None,
            ttl_seconds: 30 * 24 * 3600,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            registration: RegistrationSettings::default(),
            advanced: AdvancedSettings::default(),
            roles: vec![
                RoleSeed {
                    name: "Authenticated".to_owned(),
                    kind: AUTHENTICATED_ROLE.to_owned(),
                    description: "Default role given to authenticated user.".to_owned(),
                },
                RoleSeed {
                    name: "Public".to_owned(),
                    kind: PUBLIC_ROLE.to_owned(),
                    description: "Default role given to unauthenticated user.".to_owned(),
                },
            ],
        }
    }
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            allowed_fields: vec!["phone".to_owned()],
            password_pattern: None,
            private_fields: Vec::new(),
        }
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            allow_register: true,
            default_role: AUTHENTICATED_ROLE.to_owned(),
            email_confirmation: false,
            unique_email: false,
        }
    }
}
