//! Inventory cycle / count reconciliation.
//!
//! Pure state machine for per-bin count records and their cycle:
//! `Pending -> Counted -> Adjusted | Verified`, with cycle-level progress
//! counters. The backend persists every transition; this module computes
//! the expected next state, validates inputs before a network call is
//! attempted, and gates which operator actions are available per status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockyard_core::{CountId, CountStatus, CycleStatus, InventoryCount, InventoryCycle};

use super::ValidationError;

/// Operator actions available for a count record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountAction {
    /// Submit a counted quantity.
    Count,
    /// Commit a stock adjustment equal to the variance.
    Adjust,
    /// Confirm the count in a secondary pass.
    Verify,
}

/// Actions the operator may take on a count in its current state.
///
/// `Adjust` is only offered while a non-zero variance is unresolved.
#[must_use]
pub fn available_actions(count: &InventoryCount) -> Vec<CountAction> {
    match count.status {
        CountStatus::Pending => vec![CountAction::Count],
        CountStatus::Counted => {
            if count.has_open_variance() {
                vec![CountAction::Adjust, CountAction::Verify]
            } else {
                vec![CountAction::Verify]
            }
        }
        CountStatus::Adjusted | CountStatus::Verified => Vec::new(),
    }
}

/// Parse the operator's counted-quantity input.
///
/// The count form submits either a JSON number or the raw text-field value;
/// empty, non-numeric, and negative inputs are rejected before any backend
/// call.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCountQuantity`] for anything that is
/// not a non-negative integer.
pub fn parse_counted_quantity(raw: &serde_json::Value) -> Result<i64, ValidationError> {
    let quantity = match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<i64>().ok()
            }
        }
        _ => None,
    };
    match quantity {
        Some(q) if q >= 0 => Ok(q),
        _ => Err(ValidationError::InvalidCountQuantity),
    }
}

/// `Pending -> Counted`: record a submitted quantity.
///
/// Sets `counted_quantity`, computes `variance = counted - expected`, and
/// stamps `counted_at`.
///
/// # Errors
///
/// Returns [`ValidationError::CountNotPending`] unless the record is
/// `Pending`.
pub fn record_count(
    count: &InventoryCount,
    counted_quantity: i64,
    now: DateTime<Utc>,
) -> Result<InventoryCount, ValidationError> {
    if count.status != CountStatus::Pending {
        return Err(ValidationError::CountNotPending {
            status: count.status,
        });
    }
    Ok(InventoryCount {
        status: CountStatus::Counted,
        counted_quantity: Some(counted_quantity),
        variance: Some(counted_quantity - count.expected_quantity),
        counted_at: Some(now),
        ..count.clone()
    })
}

/// `Counted -> Adjusted`: resolve a non-zero variance by adjusting stock.
///
/// # Errors
///
/// Returns [`ValidationError::NothingToAdjust`] unless the record is
/// `Counted` with a non-zero variance.
pub fn record_adjustment(
    count: &InventoryCount,
    now: DateTime<Utc>,
) -> Result<InventoryCount, ValidationError> {
    if !count.has_open_variance() {
        return Err(ValidationError::NothingToAdjust);
    }
    Ok(InventoryCount {
        status: CountStatus::Adjusted,
        adjusted_at: Some(now),
        ..count.clone()
    })
}

/// `Counted -> Verified`: secondary confirmation pass.
///
/// # Errors
///
/// Returns [`ValidationError::NotCounted`] unless the record is `Counted`.
pub fn record_verification(count: &InventoryCount) -> Result<InventoryCount, ValidationError> {
    if count.status != CountStatus::Counted {
        return Err(ValidationError::NotCounted {
            status: count.status,
        });
    }
    Ok(InventoryCount {
        status: CountStatus::Verified,
        ..count.clone()
    })
}

/// `Draft -> InProgress`: begin counting.
///
/// The backend initializes one `Pending` count per in-scope bin with the
/// current system quantity as `expected_quantity`; locally the cycle's
/// progress counters reset and `started_at` is stamped.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCycleTransition`] unless the cycle is
/// `Draft`.
pub fn start_cycle(
    cycle: &InventoryCycle,
    now: DateTime<Utc>,
) -> Result<InventoryCycle, ValidationError> {
    check_cycle_transition(cycle, CycleStatus::InProgress)?;
    Ok(InventoryCycle {
        status: CycleStatus::InProgress,
        counted_bins: 0,
        adjusted_bins: 0,
        started_at: Some(now),
        ..cycle.clone()
    })
}

/// Increment the cycle's counted-bins counter after a `Pending -> Counted`
/// transition.
#[must_use]
pub fn note_counted(cycle: &InventoryCycle) -> InventoryCycle {
    InventoryCycle {
        counted_bins: (cycle.counted_bins + 1).min(cycle.total_bins),
        ..cycle.clone()
    }
}

/// Increment the cycle's adjusted-bins counter after a
/// `Counted -> Adjusted` transition.
#[must_use]
pub fn note_adjusted(cycle: &InventoryCycle) -> InventoryCycle {
    InventoryCycle {
        adjusted_bins: (cycle.adjusted_bins + 1).min(cycle.total_bins),
        ..cycle.clone()
    }
}

/// What completing a cycle would entail right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPlan {
    /// Warning shown to the operator when bins remain uncounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncounted_warning: Option<String>,
    /// Counts that `auto_adjust` would resolve to `Adjusted`.
    pub auto_adjust_targets: Vec<CountId>,
}

/// Plan completion of an in-progress cycle.
///
/// Completion is permitted with `Pending` counts outstanding, but the plan
/// carries an explicit warning the operator must see first. With
/// `auto_adjust` set, all outstanding non-zero-variance `Counted` records
/// are listed for adjustment as part of completion.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCycleTransition`] unless the cycle is
/// `InProgress`.
pub fn plan_completion(
    cycle: &InventoryCycle,
    counts: &[InventoryCount],
    auto_adjust: bool,
) -> Result<CompletionPlan, ValidationError> {
    check_cycle_transition(cycle, CycleStatus::Completed)?;

    let uncounted_warning = (cycle.counted_bins < cycle.total_bins).then(|| {
        format!(
            "{} of {} bins have not been counted",
            cycle.total_bins - cycle.counted_bins,
            cycle.total_bins
        )
    });

    let auto_adjust_targets = if auto_adjust {
        counts
            .iter()
            .filter(|c| c.has_open_variance())
            .map(|c| c.id)
            .collect()
    } else {
        Vec::new()
    };

    Ok(CompletionPlan {
        uncounted_warning,
        auto_adjust_targets,
    })
}

/// `* -> Cancelled` from any non-terminal state.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCycleTransition`] if the cycle is
/// already terminal.
pub fn cancel_cycle(cycle: &InventoryCycle) -> Result<InventoryCycle, ValidationError> {
    check_cycle_transition(cycle, CycleStatus::Cancelled)?;
    Ok(InventoryCycle {
        status: CycleStatus::Cancelled,
        ..cycle.clone()
    })
}

fn check_cycle_transition(
    cycle: &InventoryCycle,
    to: CycleStatus,
) -> Result<(), ValidationError> {
    if cycle.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCycleTransition {
            from: cycle.status,
            to,
        })
    }
}
