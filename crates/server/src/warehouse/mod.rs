//! Warehouse derivation and validation core.
//!
//! Everything in this module is pure: grid derivation, occupancy
//! classification, move validation, and the cycle-count state machine all
//! operate on data already fetched from the inventory backend. No I/O
//! happens here; the route handlers wire these functions to the
//! [`crate::inventory`] client.

pub mod grid;
pub mod moves;
pub mod occupancy;
pub mod reconcile;

pub use grid::{AisleGrid, GridSource, ShelfRow, ZoneGrid, ZoneMap};
pub use moves::{MovePlan, plan_move};
pub use occupancy::{BinFilter, FillBand, HighlightSpec, OccupancySummary, fill_percent};
pub use reconcile::{CompletionPlan, CountAction, available_actions, parse_counted_quantity};

use stockyard_core::{CountStatus, CycleStatus};
use thiserror::Error;

/// Local precondition failures, raised before any backend call is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Move target resolves to the source bin.
    #[error("cannot move an item to its own bin")]
    SameBin,

    /// Move quantity is zero, negative, or exceeds the item's quantity.
    #[error("move quantity must be between 1 and {available}")]
    InvalidQuantity { available: i64 },

    /// Counted quantity input is empty, non-numeric, or negative.
    #[error("counted quantity must be a non-negative number")]
    InvalidCountQuantity,

    /// Count submission against a record that is not pending.
    #[error("count is already {status}")]
    CountNotPending { status: CountStatus },

    /// Adjustment against a record without an open variance.
    #[error("only a counted record with a non-zero variance can be adjusted")]
    NothingToAdjust,

    /// Verification against a record that has not been counted.
    #[error("only a counted record can be verified")]
    NotCounted { status: CountStatus },

    /// Cycle operation that its current status does not permit.
    #[error("cycle status {from} does not permit {to}")]
    InvalidCycleTransition { from: CycleStatus, to: CycleStatus },
}
