//! Access control guard and principal resolution.
//!
//! Role checks are driven by an enum-keyed permission table rather than
//! ad-hoc role lists passed per call site, so the whole policy is visible
//! in one place and exhaustively testable.
//!
//! Principal resolution (bearer credential -> [`Principal`]) is an
//! external collaborator; this module only defines the consumed seam
//! ([`PrincipalResolver`]) and a mock implementation for tests.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Principal, Role};

/// Role-gated operation exposed by the storefront.
///
/// Placing an order and browsing the catalog are public (guest checkout)
/// and therefore have no variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    ListOrders,
    UpdateOrderStatus,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ListOrders => write!(f, "list_orders"),
            Action::UpdateOrderStatus => write!(f, "update_order_status"),
            Action::CreateProduct => write!(f, "create_product"),
            Action::UpdateProduct => write!(f, "update_product"),
            Action::DeleteProduct => write!(f, "delete_product"),
        }
    }
}

/// Roles permitted to perform an action.
pub fn allowed_roles(action: Action) -> &'static [Role] {
    match action {
        Action::ListOrders => &[Role::Merchant, Role::Admin],
        Action::UpdateOrderStatus => &[Role::Merchant, Role::Admin],
        Action::CreateProduct => &[Role::Admin],
        Action::UpdateProduct => &[Role::Merchant, Role::Admin],
        Action::DeleteProduct => &[Role::Admin],
    }
}

/// Check that the principal's role permits the action.
///
/// Pure function of role membership; no state.
///
/// # Errors
///
/// Returns [`Error::Forbidden`] if the role is not in the action's
/// permitted set.
pub fn authorize(principal: &Principal, action: Action) -> Result<()> {
    if allowed_roles(action).contains(&principal.role) {
        debug!("✓ {} authorized for {}", principal.role, action);
        Ok(())
    } else {
        warn!("✗ {} denied for {}", principal.role, action);
        Err(Error::Forbidden)
    }
}

/// Collaborator seam: resolve a bearer credential to a principal.
///
/// Token issuance, password hashing, and registration live outside this
/// core. Implementations wrap whatever verifier the application uses.
#[allow(async_fn_in_trait)]
pub trait PrincipalResolver: Send + Sync {
    /// Resolve a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] for unknown or expired tokens,
    /// [`Error::StorageUnavailable`] if the verifier cannot be reached.
    async fn resolve(&self, token: &str) -> Result<Principal>;
}

/// In-memory token table for tests and examples.
#[derive(Clone, Default)]
pub struct StaticResolver {
    tokens: Arc<DashMap<String, Principal>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a principal.
    pub fn insert(&self, token: impl Into<String>, principal: Principal) {
        self.tokens.insert(token.into(), principal);
    }
}

impl PrincipalResolver for StaticResolver {
    async fn resolve(&self, token: &str) -> Result<Principal> {
        self.tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::Unauthenticated)
    }
}
