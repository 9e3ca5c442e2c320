//! Inventory reservation engine - order placement against shared stock.
//!
//! Placement is all-or-nothing across an order's items: every line item
//! is validated first, then stock is taken via the catalog's atomic
//! conditional decrement, and any failure after a partial application
//! rolls the applied decrements back before the error is returned.
//!
//! Per-product serialization comes from the catalog contract
//! ([`CatalogStore::conditional_decrement`]); the engine adds the
//! cross-product compensation (saga) sequence, since no multi-document
//! transaction is assumed to exist at the storage layer.

use std::time::Duration;

use crate::catalog::CatalogStore;
use crate::error::{Error, Result};
use crate::ledger::OrderLedger;
use crate::model::{compute_total, Order, OrderDraft, OrderItem};

/// Attempts per release before the rollback is handed to manual
/// reconciliation.
const DEFAULT_RELEASE_ATTEMPTS: u32 = 5;

/// Order placement engine over a catalog store.
///
/// The engine is invoked concurrently by many independent in-flight
/// requests; it holds no locks of its own. All serialization happens
/// per product inside the catalog, so unrelated orders never contend.
///
/// # Example
///
/// ```ignore
/// use storefront_kit::{ReservationEngine, catalog::InMemoryCatalog, ledger::InMemoryLedger};
///
/// let engine = ReservationEngine::new(InMemoryCatalog::new());
/// let ledger = InMemoryLedger::new();
/// let order = engine.place_order(draft, &ledger).await?;
/// assert_eq!(order.status, OrderStatus::Pending);
/// ```
pub struct ReservationEngine<C: CatalogStore> {
    catalog: C,
    release_attempts: u32,
}

impl<C: CatalogStore> ReservationEngine<C> {
    /// Create a new engine over the given catalog.
    pub fn new(catalog: C) -> Self {
        ReservationEngine {
            catalog,
            release_attempts: DEFAULT_RELEASE_ATTEMPTS,
        }
    }

    /// Override the per-release retry budget used during rollback.
    pub fn with_release_attempts(mut self, attempts: u32) -> Self {
        self.release_attempts = attempts.max(1);
        self
    }

    /// Get catalog reference (for advanced use).
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Place an order: validate, reserve stock, persist the snapshot.
    ///
    /// Validation runs per item in submission order, short-circuiting on
    /// the first failure. Decrements are applied only after every item
    /// validates; a decrement refused by a concurrent race is
    /// re-classified against current stock, previously applied decrements
    /// are released, and the per-item error is returned. On full success
    /// the order is persisted as `Pending` and returned.
    ///
    /// The operation has no retry of its own and is not idempotent across
    /// caller retries: each successful call creates a new order.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`]: empty customer field, empty item list, or
    ///   zero quantity
    /// - [`Error::TotalMismatch`]: declared total differs from the
    ///   recomputed item sum
    /// - [`Error::ProductNotFound`] / [`Error::ProductUnavailable`] /
    ///   [`Error::InsufficientStock`]: per-item failure; no stock remains
    ///   reserved for this order
    /// - [`Error::StorageUnavailable`]: catalog or ledger unreachable;
    ///   applied decrements are rolled back first
    pub async fn place_order<L: OrderLedger>(&self, draft: OrderDraft, ledger: &L) -> Result<Order> {
        draft.validate()?;

        let computed = compute_total(&draft.items);
        if computed != draft.total {
            debug!(
                "✗ Order rejected: declared total {} != computed {}",
                draft.total, computed
            );
            return Err(Error::TotalMismatch {
                declared: draft.total,
                computed,
            });
        }

        // Pre-flight validation pass. A concurrent sale can still
        // invalidate any of these checks before the decrement pass, so
        // the decrement re-checks atomically; this pass exists to reject
        // doomed orders with a precise error before touching stock.
        for item in &draft.items {
            self.validate_item(item).await?;
        }

        self.reserve(&draft.items).await?;

        let order = Order::from_draft(draft);
        if let Err(e) = ledger.insert(order.clone()).await {
            // The reservation must not outlive a failed persist.
            warn!(
                "⚠ Ledger insert failed for order {}, releasing stock: {}",
                order.id, e
            );
            self.roll_back(&order.items, order.items.len()).await;
            return Err(e);
        }

        info!(
            "✓ Order {} placed: {} items, total {}",
            order.id,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    /// Three-step per-item validation: exists, available, enough stock.
    async fn validate_item(&self, item: &OrderItem) -> Result<()> {
        let product = self
            .catalog
            .get(&item.product_id)
            .await?
            .ok_or_else(|| Error::ProductNotFound(item.product_id.clone()))?;

        if !product.available {
            return Err(Error::ProductUnavailable(item.product_id.clone()));
        }
        if product.stock < item.quantity {
            return Err(Error::InsufficientStock {
                product_id: item.product_id.clone(),
                requested: item.quantity,
                available: product.stock,
            });
        }
        Ok(())
    }

    /// Apply conditional decrements across all items, in submission
    /// order, rolling back on the first failure.
    async fn reserve(&self, items: &[OrderItem]) -> Result<()> {
        for (index, item) in items.iter().enumerate() {
            let applied = match self
                .catalog
                .conditional_decrement(&item.product_id, item.quantity)
                .await
            {
                Ok(applied) => applied,
                Err(e) => {
                    self.roll_back(items, index).await;
                    return Err(e);
                }
            };

            if !applied {
                // Lost a race since the validation pass.
                let error = self.classify_refusal(item).await;
                debug!("✗ Reservation failed at item {}: {}", index, error);
                self.roll_back(items, index).await;
                return Err(error);
            }
        }
        Ok(())
    }

    /// A refused decrement carries no reason; re-read the product to
    /// report the precise error kind.
    async fn classify_refusal(&self, item: &OrderItem) -> Error {
        match self.catalog.get(&item.product_id).await {
            Ok(None) => Error::ProductNotFound(item.product_id.clone()),
            Ok(Some(product)) if !product.available => {
                Error::ProductUnavailable(item.product_id.clone())
            }
            Ok(Some(product)) => Error::InsufficientStock {
                product_id: item.product_id.clone(),
                requested: item.quantity,
                available: product.stock,
            },
            Err(e) => e,
        }
    }

    /// Release the decrements already applied for items `0..count`, in
    /// reverse order.
    ///
    /// Rollback is never abandoned silently: each release is retried with
    /// exponential backoff, and on budget exhaustion the outstanding
    /// release is logged at error level for manual reconciliation.
    /// Leaving stock permanently under-counted is worse than a slow
    /// response.
    async fn roll_back(&self, items: &[OrderItem], count: usize) {
        for item in items[..count].iter().rev() {
            let mut attempt = 0;
            loop {
                attempt += 1;
                match self.catalog.release(&item.product_id, item.quantity).await {
                    Ok(()) => break,
                    Err(e) if attempt < self.release_attempts => {
                        debug!(
                            "Release of {} x{} failed (attempt {}/{}): {}",
                            item.product_id, item.quantity, attempt, self.release_attempts, e
                        );
                        let delay = Duration::from_millis(100 * 2_u64.pow(attempt - 1));
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) => {
                        error!(
                            "Rollback abandoned after {} attempts: {} x{} not released ({}). \
                             Manual reconciliation required.",
                            attempt, item.product_id, item.quantity, e
                        );
                        break;
                    }
                }
            }
        }
    }
}
