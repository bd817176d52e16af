use shub_kernel::config::{ConfigError, load_config};
use shub_kernel::domain::config::ApiConfig;
use std::fs;

#[test]
fn loads_toml_file_over_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        r#"
[server]
port = 8081

[security.jwt]
secret = "from-file"

[identity.registration]
allowed_fields = ["phone", "firstName"]
private_fields = ["resetPasswordToken"]

[identity.advanced]
email_confirmation = true

[[identity.roles]]
name = "Customer"
type = "customer"
"#,
    )
    .expect("write config");

    let cfg: ApiConfig = load_config(Some(&path)).expect("config loads");

    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.security.jwt.secret, "from-file");
    assert_eq!(cfg.identity.registration.allowed_fields, vec!["phone", "firstName"]);
    assert_eq!(cfg.identity.registration.private_fields, vec!["resetPasswordToken"]);
    assert!(cfg.identity.advanced.email_confirmation);
    assert!(cfg.identity.advanced.allow_register);
    assert_eq!(cfg.identity.roles[0].kind, "customer");
    assert_eq!(cfg.log.level, "info");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_config::<ApiConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();

    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}
