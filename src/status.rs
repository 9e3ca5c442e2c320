//! Order status state machine.
//!
//! Governs which status transitions are legal for a placed order:
//!
//! | from      | to        | allowed |
//! |-----------|-----------|---------|
//! | Pending   | Accepted  | yes     |
//! | Pending   | Refused   | yes     |
//! | Accepted  | Completed | yes     |
//! | Refused   | *         | no      |
//! | Completed | *         | no      |
//! | Pending   | Completed | no (must pass through Accepted) |
//!
//! The table is deliberately stricter than an arbitrary status overwrite:
//! `Refused` and `Completed` are terminal, and an order must be accepted
//! before it can be completed.

use crate::error::{Error, Result};
use crate::model::OrderStatus;

/// Whether the transition table allows `from -> to`.
///
/// Self-transitions are not allowed; a no-op update is still an illegal
/// transition.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Accepted) | (Pending, Refused) | (Accepted, Completed)
    )
}

/// Check a transition, returning the target status or
/// [`Error::IllegalTransition`].
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus> {
    if can_transition(from, to) {
        Ok(to)
    } else {
        Err(Error::IllegalTransition { from, to })
    }
}

/// Whether no further transitions are possible from `status`.
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Refused | OrderStatus::Completed)
}
