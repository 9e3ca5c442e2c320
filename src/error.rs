//! Error types for the storefront core.

use rust_decimal::Decimal;
use std::fmt;

use crate::model::OrderStatus;

/// Result type for storefront operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the storefront core.
///
/// Every failure condition with a name in the order-placement and
/// order-management flow has its own variant. Callers never receive a
/// generic failure for a condition that has a named kind, so each variant
/// maps to a stable, distinguishable client-facing response.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A line item referenced a product id that does not exist.
    ///
    /// Raised during per-item validation of order placement, and by
    /// catalog lookups and management operations on absent products.
    ProductNotFound(String),

    /// The product exists but is flagged unavailable.
    ///
    /// A product is unavailable when its stock reached zero or when a
    /// manager forced it off sale. Orders against it are rejected whole.
    ProductUnavailable(String),

    /// The product has less stock than the requested quantity.
    ///
    /// `available` is the stock observed when the check failed. Under a
    /// concurrent race it may be the pre-race or post-race value, but the
    /// decrement that produced this error was never applied.
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    /// The declared order total does not equal the recomputed sum of
    /// `unit_price * quantity` across the submitted items.
    ///
    /// The total is recomputed and compared rather than trusted, so a
    /// manipulated total is rejected instead of silently accepted.
    TotalMismatch { declared: Decimal, computed: Decimal },

    /// No order exists with the given id.
    OrderNotFound(String),

    /// The requested status transition is forbidden by the transition
    /// table.
    ///
    /// `Refused` and `Completed` are terminal; `Completed` is reachable
    /// only through `Accepted`. See [`crate::status`].
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The caller's role does not permit the requested operation.
    Forbidden,

    /// No principal could be resolved from the presented credential.
    Unauthenticated,

    /// The catalog store or order ledger is unreachable or failed.
    ///
    /// Not retried automatically, except inside the compensation path of
    /// a partially applied reservation, where rollback is retried until
    /// it succeeds or is logged for manual reconciliation.
    StorageUnavailable(String),

    /// Malformed input: empty customer fields, zero quantities, an empty
    /// item list, or a catalog write that would violate the
    /// stock/availability invariant.
    Validation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ProductNotFound(id) => write!(f, "Product not found: {}", id),
            Error::ProductUnavailable(id) => write!(f, "Product not available: {}", id),
            Error::InsufficientStock {
                product_id,
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock for {}: requested {}, available {}",
                product_id, requested, available
            ),
            Error::TotalMismatch { declared, computed } => write!(
                f,
                "Order total mismatch: declared {}, computed {}",
                declared, computed
            ),
            Error::OrderNotFound(id) => write!(f, "Order not found: {}", id),
            Error::IllegalTransition { from, to } => {
                write!(f, "Illegal status transition: {} -> {}", from, to)
            }
            Error::Forbidden => write!(f, "Insufficient permissions"),
            Error::Unauthenticated => write!(f, "Not authenticated"),
            Error::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}
