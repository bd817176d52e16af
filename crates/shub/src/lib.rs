//! Facade crate for `StoreHub` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `shub` with the `server` feature.
//! - Call `shub::init` to build every feature slice; extend as new slices appear.

pub use shub_domain as domain;
use shub_domain::config::ApiConfig;
use shub_domain::registry::InitializedSlice;
pub use shub_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use shub_identity::server::identity_router;
        pub use shub_kernel::server::router::system_router;
        pub use shub_orders::server::orders_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use shub_identity as identity;
    pub use shub_orders as orders;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "identity",
        "orders",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Failure while initializing a feature slice.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("identity slice: {0}")]
    Identity(#[from] features::identity::IdentityError),
    #[error("orders slice: {0}")]
    Orders(#[from] features::orders::OrdersError),
}

/// Initialize all enabled features.
///
/// # Errors
/// Returns the first slice initialization failure.
pub fn init(config: &ApiConfig) -> Result<Vec<InitializedSlice>, InitError> {
    let mut slices = Vec::new();

    // Identity (registration, login, bearer tokens)
    slices.push(features::identity::init(config)?);

    // Orders (user-scoped creation)
    slices.push(features::orders::init()?);

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slice_initializes_from_defaults() {
        let slices = init(&ApiConfig::default()).expect("slices");
        assert_eq!(slices.len(), 2);
        assert!(features::is_enabled("orders"));
        assert!(!features::is_enabled("billing"));
    }
}
