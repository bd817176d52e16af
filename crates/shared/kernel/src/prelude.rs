//! Common imports for slice crates.

pub use crate::config::{ConfigError, load_config};
pub use crate::safe_nanoid;
#[cfg(feature = "server")]
pub use crate::security::bearer_token;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError, ErrorBody};
pub use shub_domain::registry::{FeatureSlice, InitializedSlice};
