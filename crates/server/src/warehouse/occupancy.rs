//! Bin occupancy classification, filtering, and highlighting.

use serde::{Deserialize, Serialize};

use stockyard_core::{BinId, BinOccupancy};

/// Fill percentage of a bin: `ceil(100 * occupancy / capacity)`, clamped to
/// `[0, 100]`. A bin without positive capacity is always 0%.
#[must_use]
pub fn fill_percent(capacity: i64, current_occupancy: i64) -> u8 {
    if capacity <= 0 || current_occupancy <= 0 {
        return 0;
    }
    let pct = (100 * current_occupancy + capacity - 1) / capacity;
    u8::try_from(pct.clamp(0, 100)).unwrap_or(100)
}

/// Discretized occupancy classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillBand {
    /// 0%
    Empty,
    /// 1-25%
    Low,
    /// 26-50%
    Medium,
    /// 51-75%
    High,
    /// 76-100%
    Full,
}

impl FillBand {
    /// Band for a clamped fill percentage.
    #[must_use]
    pub const fn from_percent(percent: u8) -> Self {
        match percent {
            0 => Self::Empty,
            1..=25 => Self::Low,
            26..=50 => Self::Medium,
            51..=75 => Self::High,
            _ => Self::Full,
        }
    }

    /// Band for a bin's current occupancy.
    #[must_use]
    pub fn of_bin(bin: &BinOccupancy) -> Self {
        Self::from_percent(fill_percent(bin.capacity, bin.current_occupancy))
    }
}

/// Categorical bin filter. `Blocked` is orthogonal to the fill bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinFilter {
    #[default]
    All,
    Empty,
    Occupied,
    Full,
    Blocked,
}

impl BinFilter {
    /// Whether a bin passes this filter.
    #[must_use]
    pub fn matches(self, bin: &BinOccupancy) -> bool {
        match self {
            Self::All => true,
            Self::Empty => FillBand::of_bin(bin) == FillBand::Empty,
            Self::Occupied => FillBand::of_bin(bin) != FillBand::Empty,
            Self::Full => FillBand::of_bin(bin) == FillBand::Full,
            Self::Blocked => bin.is_blocked,
        }
    }
}

impl std::str::FromStr for BinFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "empty" => Ok(Self::Empty),
            "occupied" => Ok(Self::Occupied),
            "full" => Ok(Self::Full),
            "blocked" => Ok(Self::Blocked),
            _ => Err(format!("invalid bin filter: {s}")),
        }
    }
}

/// Highlight targets layered on top of filtering: an externally supplied
/// bin (e.g. a deep link) and/or an address search substring.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightSpec<'a> {
    /// Bin to highlight regardless of search.
    pub target: Option<BinId>,
    /// Case-insensitive address substring.
    pub query: Option<&'a str>,
}

impl HighlightSpec<'_> {
    /// Whether a bin is highlighted. Highlighting does not replace
    /// filtering; both can apply to the same bin.
    #[must_use]
    pub fn is_highlighted(&self, bin: &BinOccupancy) -> bool {
        if self.target == Some(bin.id) {
            return true;
        }
        self.query
            .is_some_and(|q| bin.address.contains_ignore_case(q))
    }
}

/// Aggregate occupancy counts for a zone.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub total_bins: usize,
    pub empty_bins: usize,
    pub occupied_bins: usize,
    pub full_bins: usize,
    pub blocked_bins: usize,
}

impl OccupancySummary {
    /// Count bins per classification. Blocked counts overlap the fill-band
    /// counts since blocking is orthogonal.
    #[must_use]
    pub fn summarize(bins: &[BinOccupancy]) -> Self {
        let mut summary = Self {
            total_bins: bins.len(),
            ..Self::default()
        };
        for bin in bins {
            match FillBand::of_bin(bin) {
                FillBand::Empty => summary.empty_bins += 1,
                FillBand::Full => {
                    summary.occupied_bins += 1;
                    summary.full_bins += 1;
                }
                _ => summary.occupied_bins += 1,
            }
            if bin.is_blocked {
                summary.blocked_bins += 1;
            }
        }
        summary
    }
}
