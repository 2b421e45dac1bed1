//! Status enums for inventory cycles and per-bin counts.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory cycle.
///
/// Transitions are monotonic: `Draft -> InProgress -> Completed`, with
/// `Cancelled` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl CycleStatus {
    /// Whether the cycle has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a transition to `next` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Draft, Self::InProgress) | (Self::InProgress, Self::Completed) => true,
            (Self::Draft | Self::InProgress, Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for CycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid cycle status: {s}")),
        }
    }
}

/// Status of one bin's count record within a cycle.
///
/// Lifecycle: `Pending -> Counted -> Adjusted | Verified`. `Adjusted` and
/// `Verified` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountStatus {
    #[default]
    Pending,
    Counted,
    Adjusted,
    Verified,
}

impl CountStatus {
    /// Whether the count has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Adjusted | Self::Verified)
    }
}

impl std::fmt::Display for CountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Counted => write!(f, "counted"),
            Self::Adjusted => write!(f, "adjusted"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

impl std::str::FromStr for CountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "counted" => Ok(Self::Counted),
            "adjusted" => Ok(Self::Adjusted),
            "verified" => Ok(Self::Verified),
            _ => Err(format!("invalid count status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_transitions_monotonic() {
        assert!(CycleStatus::Draft.can_transition_to(CycleStatus::InProgress));
        assert!(CycleStatus::InProgress.can_transition_to(CycleStatus::Completed));
        assert!(!CycleStatus::Completed.can_transition_to(CycleStatus::InProgress));
        assert!(!CycleStatus::Draft.can_transition_to(CycleStatus::Completed));
    }

    #[test]
    fn test_cycle_cancel_from_non_terminal_only() {
        assert!(CycleStatus::Draft.can_transition_to(CycleStatus::Cancelled));
        assert!(CycleStatus::InProgress.can_transition_to(CycleStatus::Cancelled));
        assert!(!CycleStatus::Completed.can_transition_to(CycleStatus::Cancelled));
        assert!(!CycleStatus::Cancelled.can_transition_to(CycleStatus::Cancelled));
    }

    #[test]
    fn test_cycle_status_serde_screaming_snake() {
        let json = serde_json::to_string(&CycleStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_count_status_terminal() {
        assert!(!CountStatus::Pending.is_terminal());
        assert!(!CountStatus::Counted.is_terminal());
        assert!(CountStatus::Adjusted.is_terminal());
        assert!(CountStatus::Verified.is_terminal());
    }

    #[test]
    fn test_status_from_str_roundtrip() {
        for status in [
            CycleStatus::Draft,
            CycleStatus::InProgress,
            CycleStatus::Completed,
            CycleStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<CycleStatus>().unwrap(), status);
        }
    }
}
