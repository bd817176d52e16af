use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`SHUB__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "SHUB";

#[shub_derive::shub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a layered configuration: a required base file overlaid with environment variables.
///
/// 1. **Base file**: `path`, or `server` in the working directory when `None`. The extension
///    may be omitted; any format the `config` crate understands is accepted.
/// 2. **Environment**: variables prefixed with `SHUB__`, nested with `__`
///    (e.g. `SHUB__SECURITY__JWT__SECRET` maps to `security.jwt.secret`).
///
/// # Errors
/// * The base file cannot be found or parsed.
/// * The merged values do not match `T`.
///
/// # Example
/// ```rust
/// use shub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading configuration");

    let config = builder
        .build()
        .context("building config sources")?
        .try_deserialize::<T>()
        .context("deserializing config")?;

    Ok(config)
}
