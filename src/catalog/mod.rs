//! Catalog store implementations.

use crate::error::Result;
use crate::model::{Product, ProductPatch};

pub mod inmemory;

pub use inmemory::InMemoryCatalog;

/// Trait for catalog store implementations.
///
/// Abstracts persisted products with stock counters, allowing swappable
/// stores (in-memory, SQL, document store, etc.).
///
/// **IMPORTANT:** All methods use `&self` to allow concurrent access.
/// Implementations must use interior mutability or external storage, and
/// must make [`conditional_decrement`](CatalogStore::conditional_decrement)
/// atomic per product: concurrent callers targeting the same product must
/// observe a single consistent serialization. No atomicity is required
/// across different products.
#[allow(async_fn_in_trait)]
pub trait CatalogStore: Send + Sync + Clone {
    /// Fetch a product by id.
    ///
    /// # Returns
    /// - `Ok(Some(product))` - Product found
    /// - `Ok(None)` - No product with this id (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn get(&self, product_id: &str) -> Result<Option<Product>>;

    /// List all products.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn list(&self) -> Result<Vec<Product>>;

    /// Insert a new product.
    ///
    /// # Errors
    /// Returns `Err` if validation fails or the store is unreachable
    async fn insert(&self, product: Product) -> Result<()>;

    /// Apply a partial update, returning the updated product.
    ///
    /// Implementations enforce the stock/availability invariant: a patch
    /// may force `available = false` at any time, but setting
    /// `available = true` while the resulting stock is zero is rejected,
    /// and a patch that drives stock to zero clears the flag.
    ///
    /// # Errors
    /// Returns `Err(ProductNotFound)` if absent, `Err(Validation)` if the
    /// patch violates an invariant
    async fn update(&self, product_id: &str, patch: ProductPatch) -> Result<Product>;

    /// Delete a product.
    ///
    /// Safe while orders reference the id: order snapshots copy product
    /// data and never dereference the catalog.
    ///
    /// # Errors
    /// Returns `Err(ProductNotFound)` if absent
    async fn delete(&self, product_id: &str) -> Result<()>;

    /// Atomically decrement stock by `quantity` iff the product is
    /// available and has sufficient stock.
    ///
    /// This is the load-bearing contract of the whole crate: the check
    /// and the decrement happen as one step, so two concurrent orders can
    /// never both consume the last units. A decrement that reaches zero
    /// clears `available` in the same step.
    ///
    /// # Returns
    /// - `Ok(true)` - Decrement applied
    /// - `Ok(false)` - No-op: product missing, unavailable, or short
    ///
    /// # Errors
    /// Returns `Err` only if the store is unreachable
    async fn conditional_decrement(&self, product_id: &str, quantity: u32) -> Result<bool>;

    /// Re-increment stock by `quantity` (compensation path).
    ///
    /// Restores `available = true` when stock moves off zero: the only
    /// way a released reservation drove stock to zero was its own
    /// decrement. A release against a product deleted in the meantime is
    /// a logged no-op; there is nothing left to restore.
    ///
    /// # Errors
    /// Returns `Err` only if the store is unreachable
    async fn release(&self, product_id: &str, quantity: u32) -> Result<()>;

    /// Health check - verify the store is accessible.
    ///
    /// # Errors
    /// Returns `Err` if the store is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
