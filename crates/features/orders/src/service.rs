//! Order creation: the storage collaborator, the core action and the user-scoped hook.

use crate::error::OrdersError;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use shub_domain::records::OrderRecord;
use shub_identity::Caller;
use shub_kernel::safe_nanoid;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

/// Keys the store assigns; client values would shadow them in the flattened record.
const RESERVED_KEYS: [&str; 2] = ["id", "createdAt"];

/// Persists orders.
#[async_trait]
pub trait OrderService: Debug + Send + Sync {
    async fn create(&self, data: Map<String, Value>) -> Result<OrderRecord, OrdersError>;
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<OrderRecord>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn all(&self) -> Vec<OrderRecord> {
        self.orders.read().clone()
    }
}

#[async_trait]
impl OrderService for MemoryOrderStore {
    async fn create(&self, data: Map<String, Value>) -> Result<OrderRecord, OrdersError> {
        let order = OrderRecord { id: safe_nanoid!(), created_at: Utc::now(), data };
        self.orders.write().push(order.clone());
        Ok(order)
    }
}

/// The order actions exposed over HTTP.
///
/// Customizations wrap another controller and delegate to it, see [`UserScopedOrders`].
#[async_trait]
pub trait OrderController: Debug + Send + Sync {
    async fn create(
        &self,
        caller: Option<&Caller>,
        data: Value,
    ) -> Result<OrderRecord, OrdersError>;
}

/// Stores `data` as submitted, minus the store-assigned keys.
#[derive(Debug, Clone)]
pub struct CoreOrderController {
    service: Arc<dyn OrderService>,
}

impl CoreOrderController {
    pub fn new(service: Arc<dyn OrderService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrderController for CoreOrderController {
    async fn create(
        &self,
        _caller: Option<&Caller>,
        data: Value,
    ) -> Result<OrderRecord, OrdersError> {
        let Value::Object(mut data) = data else {
            return Err(OrdersError::validation("data must be an object"));
        };
        for key in RESERVED_KEYS {
            if data.remove(key).is_some() {
                debug!(key, "Dropped client-supplied order key");
            }
        }
        self.service.create(data).await
    }
}

/// Create hook: requires a caller and records it as the order's `user`.
///
/// A client-supplied `user` is overwritten.
#[derive(Debug, Clone)]
pub struct UserScopedOrders {
    inner: Arc<dyn OrderController>,
}

impl UserScopedOrders {
    pub fn new(inner: Arc<dyn OrderController>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl OrderController for UserScopedOrders {
    async fn create(
        &self,
        caller: Option<&Caller>,
        data: Value,
    ) -> Result<OrderRecord, OrdersError> {
        let Some(caller) = caller else {
            debug!("Order rejected: no authenticated caller");
            return Err(OrdersError::unauthenticated());
        };
        let Value::Object(mut data) = data else {
            return Err(OrdersError::validation("data must be an object"));
        };

        data.insert("user".to_owned(), Value::String(caller.id.clone()));
        let order = self.inner.create(Some(caller), Value::Object(data)).await?;
        info!(order_id = %order.id, user_id = %caller.id, "Order created");

        Ok(order)
    }
}
