//! Orders feature slice.
//!
//! Order creation is scoped to the authenticated caller: [`UserScopedOrders`] stamps the
//! caller's id into `data.user` before delegating to the core controller.

pub mod error;
#[cfg(feature = "server")]
pub mod server;
mod service;

pub use crate::error::{OrdersError, OrdersErrorExt};
pub use crate::service::{
    CoreOrderController, MemoryOrderStore, OrderController, OrderService, UserScopedOrders,
};

use shub_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;

/// Orders feature state
#[shub_derive::shub_slice]
pub struct Orders {
    pub controller: Arc<dyn OrderController>,
}

/// Wraps `service` in the core controller and the user-scoped create hook.
#[must_use]
pub fn controller(service: Arc<dyn OrderService>) -> Arc<dyn OrderController> {
    let core = CoreOrderController::new(service);
    Arc::new(UserScopedOrders::new(Arc::new(core)))
}

/// Initialize the orders feature with an in-memory store.
///
/// # Errors
/// Currently infallible; kept fallible like the other slices.
pub fn init() -> Result<InitializedSlice, OrdersError> {
    let controller = controller(Arc::new(MemoryOrderStore::default()));
    tracing::info!("Orders slice initialized");

    Ok(InitializedSlice::new(Orders::new(OrdersInner { controller })))
}
