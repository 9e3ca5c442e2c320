//! Order ledger: persisted orders with an immutable snapshot and a
//! mutable status field.
//!
//! The ledger is append-only in normal operation; orders are never
//! deleted (audit trail). Status changes are conditional updates: the
//! transition-table check and the write happen under the same entry
//! lock, mirroring the catalog's conditional decrement, so two racing
//! status updates serialize and the loser gets `IllegalTransition`.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Order, OrderStatus};
use crate::status;

/// Trait for order ledger implementations.
///
/// **IMPORTANT:** All methods use `&self` to allow concurrent access.
/// Implementations must use interior mutability or external storage.
#[allow(async_fn_in_trait)]
pub trait OrderLedger: Send + Sync + Clone {
    /// Persist a newly placed order.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn insert(&self, order: Order) -> Result<()>;

    /// Fetch an order by id.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn get(&self, order_id: &str) -> Result<Option<Order>>;

    /// List all orders, newest first.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn list_newest_first(&self) -> Result<Vec<Order>>;

    /// Atomically apply a status transition, returning the updated order.
    ///
    /// Only the status field is written; the item/price snapshot and
    /// customer info are immutable. The transition-table check and the
    /// write must be one atomic step per order.
    ///
    /// # Errors
    /// Returns `Err(OrderNotFound)` if absent,
    /// `Err(IllegalTransition)` if the table forbids the move
    async fn transition_status(&self, order_id: &str, to: OrderStatus) -> Result<Order>;
}

/// Thread-safe async in-memory order ledger.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    orders: Arc<DashMap<String, Order>>,
}

impl InMemoryLedger {
    /// Create a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl OrderLedger for InMemoryLedger {
    async fn insert(&self, order: Order) -> Result<()> {
        debug!("✓ Ledger INSERT {} ({} items)", order.id, order.items.len());
        self.orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.orders.get(order_id).map(|e| e.value().clone()))
    }

    async fn list_newest_first(&self) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.iter().map(|e| e.value().clone()).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn transition_status(&self, order_id: &str, to: OrderStatus) -> Result<Order> {
        let mut entry = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| Error::OrderNotFound(order_id.to_string()))?;

        let order = entry.value_mut();
        order.status = status::check_transition(order.status, to)?;
        info!("✓ Order {} -> {}", order_id, to);
        Ok(order.clone())
    }
}
