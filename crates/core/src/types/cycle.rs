//! Inventory cycle and count domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BinId, CountId, CycleId};
use super::status::{CountStatus, CycleStatus};

/// A bounded inventory-counting campaign over a set of bins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCycle {
    /// Unique cycle ID.
    pub id: CycleId,
    /// Display name (e.g. "Q3 zone A recount").
    pub name: String,
    /// Lifecycle status.
    pub status: CycleStatus,
    /// Number of bins in the cycle's scope.
    pub total_bins: u32,
    /// Bins counted so far.
    pub counted_bins: u32,
    /// Counts resolved by stock adjustment so far.
    pub adjusted_bins: u32,
    /// When the cycle was created.
    pub created_at: DateTime<Utc>,
    /// When counting started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the cycle completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl InventoryCycle {
    /// Counting progress as a whole-number percentage.
    ///
    /// `round(counted_bins / total_bins * 100)`; zero for an empty scope.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.total_bins == 0 {
            return 0;
        }
        let pct = (f64::from(self.counted_bins) / f64::from(self.total_bins) * 100.0).round();
        // total >= counted keeps this within 0..=100
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            pct as u8
        }
    }
}

/// One bin's count record within a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCount {
    /// Unique count ID.
    pub id: CountId,
    /// Owning cycle.
    pub cycle_id: CycleId,
    /// Bin being counted.
    pub bin_id: BinId,
    /// Count status.
    pub status: CountStatus,
    /// System quantity at the time the cycle started.
    pub expected_quantity: i64,
    /// Operator-submitted quantity, once counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_quantity: Option<i64>,
    /// `counted_quantity - expected_quantity`, once counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<i64>,
    /// When the count was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_at: Option<DateTime<Utc>>,
    /// When the variance was resolved by adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_at: Option<DateTime<Utc>>,
}

impl InventoryCount {
    /// Whether the count carries an unresolved non-zero variance.
    #[must_use]
    pub fn has_open_variance(&self) -> bool {
        self.status == CountStatus::Counted && self.variance.is_some_and(|v| v != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(total: u32, counted: u32) -> InventoryCycle {
        InventoryCycle {
            id: CycleId::new(1),
            name: "test".to_string(),
            status: CycleStatus::InProgress,
            total_bins: total,
            counted_bins: counted,
            adjusted_bins: 0,
            created_at: Utc::now(),
            started_at: Some(Utc::now()),
            completed_at: None,
        }
    }

    #[test]
    fn test_progress_rounds() {
        // 28 of 45 bins -> 62%
        assert_eq!(cycle(45, 28).progress_percent(), 62);
    }

    #[test]
    fn test_progress_complete() {
        assert_eq!(cycle(45, 45).progress_percent(), 100);
    }

    #[test]
    fn test_progress_empty_scope() {
        assert_eq!(cycle(0, 0).progress_percent(), 0);
    }

    #[test]
    fn test_open_variance() {
        let mut count = InventoryCount {
            id: CountId::new(1),
            cycle_id: CycleId::new(1),
            bin_id: BinId::new(1),
            status: CountStatus::Counted,
            expected_quantity: 50,
            counted_quantity: Some(48),
            variance: Some(-2),
            counted_at: Some(Utc::now()),
            adjusted_at: None,
        };
        assert!(count.has_open_variance());

        count.variance = Some(0);
        assert!(!count.has_open_variance());

        count.variance = Some(-2);
        count.status = CountStatus::Adjusted;
        assert!(!count.has_open_variance());
    }
}
