//! Domain model: products, orders, customers, principals.
//!
//! Orders hold a denormalized snapshot of each purchased product
//! ([`OrderItem`]), so later catalog price or name changes never
//! retroactively alter a placed order, and product deletion is safe
//! without cascading.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Caller role attached to an authenticated principal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Merchant,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Merchant => write!(f, "merchant"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Authenticated identity consumed by the core.
///
/// Produced by the external auth collaborator (see
/// [`crate::access::PrincipalResolver`]); this core only reads `role`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Principal {
            id: Uuid::now_v7().to_string(),
            email: email.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a placed order.
///
/// Transitions are governed by [`crate::status`]; everything else on an
/// order is immutable after placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Refused,
    Completed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Accepted => write!(f, "accepted"),
            OrderStatus::Refused => write!(f, "refused"),
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Catalog product with a stock counter and availability flag.
///
/// Invariant: `available` is never `true` while `stock == 0`. A manager
/// may force `available = false` with stock remaining, but the reverse
/// direction is rejected at every write.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: u32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product from management input. Availability starts true
    /// unless the initial stock is zero.
    pub fn new(input: NewProduct) -> Self {
        Product {
            id: Uuid::now_v7().to_string(),
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            available: input.stock > 0,
            stock: input.stock,
            created_at: Utc::now(),
        }
    }

    /// Check the price and stock/availability invariants.
    pub fn validate(&self) -> Result<()> {
        if self.price < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "price must be non-negative, got {}",
                self.price
            )));
        }
        if self.available && self.stock == 0 {
            return Err(Error::Validation(
                "product cannot be available with zero stock".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input for creating a catalog product.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update for a catalog product. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub available: Option<bool>,
}

/// Immutable line-item snapshot captured at order-creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// Line subtotal: `unit_price * quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Recompute an order total from its line items.
pub fn compute_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::subtotal).sum()
}

/// Customer contact details attached to an order. All fields required.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    /// Reject empty or whitespace-only fields.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!(
                    "customer {} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Order-placement request: customer, line items, declared total.
///
/// The declared total is recomputed and compared server-side; the items
/// become the order's immutable snapshot on success.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

impl OrderDraft {
    /// Structural validation: non-empty customer fields, at least one
    /// item, every quantity at least 1.
    pub fn validate(&self) -> Result<()> {
        self.customer.validate()?;
        if self.items.is_empty() {
            return Err(Error::Validation("order must contain items".to_string()));
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(Error::Validation(format!(
                    "quantity for {} must be at least 1",
                    item.product_id
                )));
            }
        }
        Ok(())
    }
}

/// Persisted order: immutable snapshot plus a mutable status field.
///
/// Orders are never deleted in normal operation (audit trail).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a Pending order from a validated draft.
    pub fn from_draft(draft: OrderDraft) -> Self {
        Order {
            id: Uuid::now_v7().to_string(),
            customer: draft.customer,
            items: draft.items,
            total: draft.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
