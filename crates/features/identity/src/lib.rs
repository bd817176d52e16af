//! Identity feature slice: local registration, login and session tokens.
//!
//! [`Registrar`] runs the registration pipeline against narrow collaborator traits
//! ([`store`], [`mailer`], [`token`], [`sanitizer`]); [`init`] wires the in-memory defaults
//! from the API configuration. The `server` feature adds the axum handlers and the
//! [`server::MaybeCaller`] extractor used by other slices.

pub mod error;
mod login;
pub mod mailer;
mod registrar;
pub mod sanitizer;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod token;
pub mod validation;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::login::Session;
pub use crate::registrar::{
    Registrar, RegistrarBuilder, RegistrationConfig, RegistrationOutcome,
};
pub use crate::sanitizer::Caller;

use crate::mailer::LogMailer;
use crate::sanitizer::PrivateFieldSanitizer;
use crate::store::{MemoryAccountStore, MemoryRoleStore, MemorySettingsStore};
use crate::token::JwtTokenService;
use crate::validation::PatternPolicy;
use shub_domain::config::ApiConfig;
use shub_domain::constants::ADVANCED_SETTINGS_KEY;
use shub_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;

/// Identity feature state
#[shub_derive::shub_slice]
pub struct Identity {
    pub registrar: Registrar,
}

/// Builds the registrar with in-memory stores seeded from `config.identity`.
///
/// # Errors
/// * [`IdentityError::Token`] when the JWT settings are unusable.
/// * [`IdentityError::Internal`] for an invalid `password_pattern`.
pub fn registrar_from_config(config: &ApiConfig) -> Result<Registrar, IdentityError> {
    let identity = &config.identity;

    let tokens = JwtTokenService::new(&config.security.jwt).context("configuring session tokens")?;
    let roles = MemoryRoleStore::from_seeds(&identity.roles);

    if !identity.roles.iter().any(|role| role.kind == identity.advanced.default_role) {
        tracing::warn!(
            role = %identity.advanced.default_role,
            "Default role is not seeded; registration will fail until it exists"
        );
    }

    let mut builder = Registrar::builder()
        .settings(Arc::new(MemorySettingsStore::with(
            ADVANCED_SETTINGS_KEY,
            identity.advanced.clone(),
        )))
        .roles(Arc::new(roles))
        .accounts(Arc::new(MemoryAccountStore::default()))
        .mailer(Arc::new(LogMailer))
        .tokens(Arc::new(tokens))
        .sanitizer(Arc::new(PrivateFieldSanitizer::new(
            identity.registration.private_fields.clone(),
        )))
        .allowed_fields(identity.registration.allowed_fields.iter().cloned());

    if let Some(pattern) = &identity.registration.password_pattern {
        let policy = PatternPolicy::new(pattern)
            .map_err(|err| IdentityError::from(format!("invalid password_pattern: {err}")))?;
        builder = builder.password_policy(Arc::new(policy));
    }

    builder.build()
}

/// Initialize the identity feature.
///
/// # Errors
/// See [`registrar_from_config`].
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, IdentityError> {
    let registrar = registrar_from_config(config)?;
    tracing::info!(
        allowed_fields = ?config.identity.registration.allowed_fields,
        "Identity slice initialized"
    );

    Ok(InitializedSlice::new(Identity::new(IdentityInner { registrar })))
}
