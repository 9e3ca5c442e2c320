//! High-level storefront service for web applications.
//!
//! Wraps the reservation engine, catalog, and ledger behind one
//! Arc-backed handle that is cheap to clone across request handlers.
//! Role gates live here: every role-gated method takes the caller's
//! [`Principal`] and checks it against the permission table before
//! touching storage.

use std::sync::Arc;

use crate::access::{self, Action};
use crate::catalog::CatalogStore;
use crate::engine::ReservationEngine;
use crate::error::{Error, Result};
use crate::ledger::OrderLedger;
use crate::media::ImageStore;
use crate::model::{NewProduct, Order, OrderDraft, OrderStatus, Principal, Product, ProductPatch};

/// Storefront facade over a catalog store and an order ledger.
///
/// `Storefront` is `Clone` for thread sharing - cloning is just an Arc
/// increment, so one instance can serve every in-flight request.
///
/// # Example
///
/// ```ignore
/// use storefront_kit::{Storefront, catalog::InMemoryCatalog, ledger::InMemoryLedger};
///
/// let store = Storefront::new(InMemoryCatalog::new(), InMemoryLedger::new());
///
/// // In your request handlers
/// let store_clone = store.clone(); // cheap
/// let order = store_clone.place_order(draft).await?;
/// ```
#[derive(Clone)]
pub struct Storefront<C: CatalogStore, L: OrderLedger> {
    inner: Arc<StorefrontInner<C, L>>,
}

struct StorefrontInner<C: CatalogStore, L: OrderLedger> {
    engine: ReservationEngine<C>,
    ledger: L,
}

impl<C: CatalogStore, L: OrderLedger> Storefront<C, L> {
    /// Create a new storefront over the given stores.
    pub fn new(catalog: C, ledger: L) -> Self {
        Storefront {
            inner: Arc::new(StorefrontInner {
                engine: ReservationEngine::new(catalog),
                ledger,
            }),
        }
    }

    /// Create a storefront with a custom-configured engine.
    pub fn with_engine(engine: ReservationEngine<C>, ledger: L) -> Self {
        Storefront {
            inner: Arc::new(StorefrontInner { engine, ledger }),
        }
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Place an order (public - guest checkout).
    ///
    /// See [`ReservationEngine::place_order`] for the validation sequence
    /// and error cases.
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Order> {
        self.inner.engine.place_order(draft, &self.inner.ledger).await
    }

    /// List all orders, newest first. Requires Merchant or Admin.
    ///
    /// # Errors
    /// Returns `Err(Forbidden)` for other roles
    pub async fn list_orders(&self, principal: &Principal) -> Result<Vec<Order>> {
        access::authorize(principal, Action::ListOrders)?;
        self.inner.ledger.list_newest_first().await
    }

    /// Apply a status transition to an order. Requires Merchant or Admin.
    ///
    /// Only the status field is mutated; the snapshot is immutable.
    ///
    /// # Errors
    /// Returns `Err(Forbidden)`, `Err(OrderNotFound)`, or
    /// `Err(IllegalTransition)` per the transition table
    pub async fn update_order_status(
        &self,
        principal: &Principal,
        order_id: &str,
        to: OrderStatus,
    ) -> Result<Order> {
        access::authorize(principal, Action::UpdateOrderStatus)?;
        self.inner.ledger.transition_status(order_id, to).await
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// List all products (public).
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.inner.engine.catalog().list().await
    }

    /// Fetch one product (public).
    ///
    /// # Errors
    /// Returns `Err(ProductNotFound)` if absent
    pub async fn get_product(&self, product_id: &str) -> Result<Product> {
        self.inner
            .engine
            .catalog()
            .get(product_id)
            .await?
            .ok_or_else(|| Error::ProductNotFound(product_id.to_string()))
    }

    /// Create a product. Requires Admin.
    pub async fn create_product(
        &self,
        principal: &Principal,
        input: NewProduct,
    ) -> Result<Product> {
        access::authorize(principal, Action::CreateProduct)?;
        let product = Product::new(input);
        self.inner.engine.catalog().insert(product.clone()).await?;
        Ok(product)
    }

    /// Create a product with an uploaded image. Requires Admin.
    ///
    /// The image bytes go to the external image store and the returned
    /// URL is attached to the product.
    pub async fn create_product_with_image<I: ImageStore>(
        &self,
        principal: &Principal,
        mut input: NewProduct,
        image_bytes: &[u8],
        image_filename: &str,
        images: &I,
    ) -> Result<Product> {
        access::authorize(principal, Action::CreateProduct)?;
        input.image_url = Some(images.store(image_bytes, image_filename).await?);
        let product = Product::new(input);
        self.inner.engine.catalog().insert(product.clone()).await?;
        Ok(product)
    }

    /// Patch a product. Requires Merchant or Admin.
    ///
    /// # Errors
    /// Returns `Err(ProductNotFound)` or `Err(Validation)` if the patch
    /// violates the stock/availability invariant
    pub async fn update_product(
        &self,
        principal: &Principal,
        product_id: &str,
        patch: ProductPatch,
    ) -> Result<Product> {
        access::authorize(principal, Action::UpdateProduct)?;
        self.inner.engine.catalog().update(product_id, patch).await
    }

    /// Delete a product. Requires Admin.
    ///
    /// Existing order snapshots are unaffected: they copied the product
    /// data at purchase time.
    pub async fn delete_product(&self, principal: &Principal, product_id: &str) -> Result<()> {
        access::authorize(principal, Action::DeleteProduct)?;
        self.inner.engine.catalog().delete(product_id).await
    }

    /// Get a reference to the underlying engine (for advanced use).
    pub fn engine(&self) -> &ReservationEngine<C> {
        &self.inner.engine
    }
}
