//! Axum plumbing shared by every slice.

pub mod error;
mod health;
pub mod router;
pub mod state;

pub use error::{ErrorBody, ErrorDetail, INTERNAL_MESSAGE};
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
