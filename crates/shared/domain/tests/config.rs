use serde_json::json;
use shub_domain::config::{AdvancedSettings, ApiConfig, IdentityConfig, ServerConfig};
use shub_domain::constants::{AUTHENTICATED_ROLE, PUBLIC_ROLE};

#[test]
fn defaults_allow_local_registration_with_phone() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let identity = IdentityConfig::default();
    assert_eq!(identity.registration.allowed_fields, vec!["phone".to_owned()]);
    assert!(identity.registration.password_pattern.is_none());

    let kinds: Vec<_> = identity.roles.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec![AUTHENTICATED_ROLE, PUBLIC_ROLE]);

    let advanced = AdvancedSettings::default();
    assert!(advanced.allow_register);
    assert_eq!(advanced.default_role, AUTHENTICATED_ROLE);
    assert!(!advanced.email_confirmation);
    assert!(!advanced.unique_email);
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "security": { "jwt": { "secret": "s3cret", "ttl_seconds": 60 } },
        "identity": {
            "registration": { "allowed_fields": ["phone", "firstName"] },
            "advanced": { "email_confirmation": true },
            "roles": [{ "name": "Customer", "type": "customer" }]
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.security.jwt.secret, "s3cret");
    assert_eq!(cfg.security.jwt.issuer, "storehub");
    assert_eq!(cfg.identity.registration.allowed_fields, vec!["phone", "firstName"]);
    assert!(cfg.identity.advanced.email_confirmation);
    assert!(cfg.identity.advanced.allow_register);
    assert_eq!(cfg.identity.roles.len(), 1);
    assert_eq!(cfg.identity.roles[0].kind, "customer");
    assert_eq!(cfg.log.level, "info");
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(changed.server.port, 9000);
}
