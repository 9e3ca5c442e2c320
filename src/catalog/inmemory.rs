//! In-memory catalog store (default, thread-safe, async).
//!
//! Uses DashMap for concurrent access with per-key sharding. An entry's
//! shard lock is held across the check-and-decrement, which makes
//! `conditional_decrement` linearizable per product without any global
//! lock across the catalog.

use super::CatalogStore;
use crate::error::{Error, Result};
use crate::model::{Product, ProductPatch};
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory catalog store.
///
/// Stock mutations for one product serialize on that product's map entry;
/// unrelated products never contend.
///
/// # Example
///
/// ```no_run
/// use storefront_kit::catalog::{CatalogStore, InMemoryCatalog};
/// use storefront_kit::model::{NewProduct, Product};
/// use rust_decimal::Decimal;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let catalog = InMemoryCatalog::new();
///
///     let product = Product::new(NewProduct {
///         name: "Mug".to_string(),
///         description: "Ceramic".to_string(),
///         price: Decimal::new(999, 2),
///         stock: 10,
///         image_url: None,
///     });
///     let id = product.id.clone();
///     catalog.insert(product).await?;
///
///     // Sell two units if at least two remain
///     assert!(catalog.conditional_decrement(&id, 2).await?);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<DashMap<String, Product>>,
}

impl InMemoryCatalog {
    /// Create a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogStore for InMemoryCatalog {
    async fn get(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self.products.get(product_id).map(|e| e.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.iter().map(|e| e.value().clone()).collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn insert(&self, product: Product) -> Result<()> {
        product.validate()?;
        debug!("✓ Catalog INSERT {} ({})", product.id, product.name);
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn update(&self, product_id: &str, patch: ProductPatch) -> Result<Product> {
        let mut entry = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| Error::ProductNotFound(product_id.to_string()))?;

        let product = entry.value_mut();
        let mut updated = product.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(stock) = patch.stock {
            updated.stock = stock;
        }
        if let Some(available) = patch.available {
            updated.available = available;
        } else if updated.stock == 0 {
            // Patches that drain stock without touching the flag clear it.
            updated.available = false;
        }
        updated.validate()?;

        *product = updated.clone();
        debug!("✓ Catalog UPDATE {}", product_id);
        Ok(updated)
    }

    async fn delete(&self, product_id: &str) -> Result<()> {
        if self.products.remove(product_id).is_none() {
            return Err(Error::ProductNotFound(product_id.to_string()));
        }
        debug!("✓ Catalog DELETE {}", product_id);
        Ok(())
    }

    async fn conditional_decrement(&self, product_id: &str, quantity: u32) -> Result<bool> {
        // get_mut holds the entry's shard write lock, so the check and
        // the decrement are one atomic step per product.
        let Some(mut entry) = self.products.get_mut(product_id) else {
            debug!("✗ Decrement {} x{} -> no such product", product_id, quantity);
            return Ok(false);
        };

        let product = entry.value_mut();
        if !product.available || product.stock < quantity {
            debug!(
                "✗ Decrement {} x{} refused (available: {}, stock: {})",
                product_id, quantity, product.available, product.stock
            );
            return Ok(false);
        }

        product.stock -= quantity;
        if product.stock == 0 {
            product.available = false;
        }
        debug!(
            "✓ Decrement {} x{} -> stock {}",
            product_id, quantity, product.stock
        );
        Ok(true)
    }

    async fn release(&self, product_id: &str, quantity: u32) -> Result<()> {
        let Some(mut entry) = self.products.get_mut(product_id) else {
            warn!(
                "⚠ Release {} x{} -> product gone, nothing to restore",
                product_id, quantity
            );
            return Ok(());
        };

        let product = entry.value_mut();
        let was_empty = product.stock == 0;
        product.stock += quantity;
        if was_empty {
            product.available = true;
        }
        debug!(
            "✓ Release {} x{} -> stock {}",
            product_id, quantity, product.stock
        );
        Ok(())
    }
}
