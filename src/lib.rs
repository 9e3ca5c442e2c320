//! # storefront-kit
//!
//! A type-safe, concurrency-safe storefront order core for Rust.
//!
//! ## Features
//!
//! - **Inventory-consistent placement:** check-and-decrement is one
//!   atomic step per product, so concurrent customers can never oversell
//!   the last units
//! - **All-or-nothing orders:** multi-item orders either reserve every
//!   line or roll back to the pre-order stock (compensation/saga path)
//! - **Explicit order lifecycle:** Pending → Accepted → Completed, with
//!   Refused and Completed terminal, enforced by a testable state machine
//! - **Immutable snapshots:** orders copy product name and price at
//!   purchase time; later catalog edits never rewrite history
//! - **Role-gated management:** an enum-keyed permission table maps
//!   Client/Merchant/Admin roles to operations
//! - **Storage Agnostic:** catalog and ledger are traits; DashMap-backed
//!   in-memory stores ship by default
//!
//! ## Quick Start
//!
//! ```ignore
//! use storefront_kit::{
//!     Storefront,
//!     catalog::InMemoryCatalog,
//!     ledger::InMemoryLedger,
//!     model::{CustomerInfo, NewProduct, OrderDraft, OrderItem, Principal, Role},
//! };
//! use rust_decimal_macros::dec;
//!
//! // 1. Build the storefront (Clone for thread sharing - just an Arc bump)
//! let store = Storefront::new(InMemoryCatalog::new(), InMemoryLedger::new());
//!
//! // 2. An admin stocks the catalog
//! let admin = Principal::new("admin@example.com", Role::Admin);
//! let mug = store.create_product(&admin, NewProduct {
//!     name: "Mug".into(),
//!     description: "Ceramic".into(),
//!     price: dec!(29.99),
//!     stock: 10,
//!     image_url: None,
//! }).await?;
//!
//! // 3. A guest places an order - validated, reserved, persisted Pending
//! let order = store.place_order(OrderDraft {
//!     customer: CustomerInfo {
//!         name: "Alice".into(), email: "alice@example.com".into(),
//!         phone: "555-0100".into(), address: "1 Main St".into(),
//!     },
//!     items: vec![OrderItem {
//!         product_id: mug.id.clone(), product_name: mug.name.clone(),
//!         unit_price: mug.price, quantity: 2,
//!     }],
//!     total: dec!(59.98),
//! }).await?;
//!
//! // 4. A merchant works the order through its lifecycle
//! let merchant = Principal::new("m@example.com", Role::Merchant);
//! store.update_order_status(&merchant, &order.id, OrderStatus::Accepted).await?;
//! store.update_order_status(&merchant, &order.id, OrderStatus::Completed).await?;
//! ```

#[macro_use]
extern crate log;

pub mod access;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod media;
pub mod model;
pub mod service;
pub mod status;

// Re-exports for convenience
pub use access::{authorize, Action, PrincipalResolver};
pub use catalog::CatalogStore;
pub use engine::ReservationEngine;
pub use error::{Error, Result};
pub use ledger::OrderLedger;
pub use media::ImageStore;
pub use model::{Order, OrderDraft, OrderStatus, Principal, Product, Role};
pub use service::Storefront;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
