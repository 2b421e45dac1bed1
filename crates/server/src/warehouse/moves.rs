//! Item move validation.
//!
//! Validates a requested move before the backend is asked to perform it:
//! the target must differ from the source bin and the quantity must be
//! within the item's bounds. The actual stock mutation is delegated to the
//! inventory backend.

use stockyard_core::{BinAddress, BinItem, BinOccupancy};

use super::ValidationError;

/// Shape of a validated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    /// The whole item record relocates to the target bin.
    Full,
    /// `remaining` units stay at the source; the moved quantity is created
    /// or merged at the target.
    Partial { remaining: i64 },
}

/// Validate a move of `quantity` units of `item` out of `source` toward
/// `target_address`.
///
/// # Errors
///
/// Returns [`ValidationError::SameBin`] when the target resolves to the
/// source bin and [`ValidationError::InvalidQuantity`] when the quantity is
/// non-positive or exceeds the item's quantity. No backend call is made on
/// failure.
pub fn plan_move(
    source: &BinOccupancy,
    item: &BinItem,
    target_address: &BinAddress,
    quantity: i64,
) -> Result<MovePlan, ValidationError> {
    if *target_address == source.address {
        return Err(ValidationError::SameBin);
    }
    if quantity <= 0 || quantity > item.quantity {
        return Err(ValidationError::InvalidQuantity {
            available: item.quantity,
        });
    }
    if quantity == item.quantity {
        Ok(MovePlan::Full)
    } else {
        Ok(MovePlan::Partial {
            remaining: item.quantity - quantity,
        })
    }
}
