//! Zone and zone-structure domain models.

use serde::{Deserialize, Serialize};

use super::id::ZoneId;

/// How bin positions within a shelf are labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinLabeling {
    /// Positions are numbered 1, 2, 3, ...
    #[default]
    Numbers,
    /// Positions are lettered A, B, C, ...
    Letters,
}

impl BinLabeling {
    /// Label for the zero-based slot index `k`.
    ///
    /// Numbers yield `k + 1`; letters yield `A` for 0, `B` for 1, and wrap
    /// spreadsheet-style (`AA`) past `Z`.
    #[must_use]
    pub fn label(self, k: u32) -> String {
        match self {
            Self::Numbers => (k + 1).to_string(),
            Self::Letters => super::address::aisle_letters(k + 1),
        }
    }
}

/// The order in which shelves are presented within an aisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinDirection {
    /// Shelf 1 (floor level) is presented first.
    #[default]
    BottomUp,
    /// The highest shelf is presented first.
    TopDown,
}

/// Per-aisle override of the uniform shelf/bin counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleConfig {
    /// 1-based aisle number.
    pub aisle_number: u32,
    /// Number of shelves in this aisle.
    pub shelves_count: u32,
    /// Number of bin slots per shelf in this aisle.
    pub bins_per_shelf: u32,
}

/// Errors raised when validating a [`ZoneStructure`] at the fetch boundary.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ZoneStructureError {
    /// An aisle config references aisle number zero.
    #[error("aisle numbers must be positive")]
    ZeroAisleNumber,
    /// Two aisle configs reference the same aisle.
    #[error("duplicate aisle number {0} in aisle configs")]
    DuplicateAisleNumber(u32),
}

/// Physical layout of a warehouse zone.
///
/// The uniform `aisles`/`shelves_per_aisle`/`bins_per_shelf` counts apply to
/// every aisle unless `aisle_configs` overrides them per aisle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStructure {
    /// Number of aisles in the zone.
    pub aisles: u32,
    /// Shelves per aisle (uniform default).
    pub shelves_per_aisle: u32,
    /// Bin slots per shelf (uniform default).
    pub bins_per_shelf: u32,
    /// Bin position labeling scheme.
    #[serde(default)]
    pub bin_labeling: BinLabeling,
    /// Shelf presentation order.
    #[serde(default)]
    pub bin_direction: BinDirection,
    /// Per-aisle overrides, in presentation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aisle_configs: Option<Vec<AisleConfig>>,
}

impl ZoneStructure {
    /// Validate the structure invariants.
    ///
    /// Every aisle number referenced by `aisle_configs` must be unique and
    /// positive. Called at the data-fetch boundary so downstream grid code
    /// can trust the structure.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneStructureError`] on a zero or duplicated aisle number.
    pub fn validate(&self) -> Result<(), ZoneStructureError> {
        let Some(configs) = &self.aisle_configs else {
            return Ok(());
        };

        let mut seen = std::collections::HashSet::new();
        for config in configs {
            if config.aisle_number == 0 {
                return Err(ZoneStructureError::ZeroAisleNumber);
            }
            if !seen.insert(config.aisle_number) {
                return Err(ZoneStructureError::DuplicateAisleNumber(
                    config.aisle_number,
                ));
            }
        }
        Ok(())
    }
}

/// A warehouse zone with its own aisle/shelf/bin structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Unique zone ID.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Short zone code (e.g. "RCV", "PICK-A").
    pub code: String,
    /// Structural configuration, absent for zones never set up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<ZoneStructure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure_with_configs(configs: Vec<AisleConfig>) -> ZoneStructure {
        ZoneStructure {
            aisles: 3,
            shelves_per_aisle: 4,
            bins_per_shelf: 5,
            bin_labeling: BinLabeling::Numbers,
            bin_direction: BinDirection::BottomUp,
            aisle_configs: Some(configs),
        }
    }

    #[test]
    fn test_labeling_numbers() {
        assert_eq!(BinLabeling::Numbers.label(0), "1");
        assert_eq!(BinLabeling::Numbers.label(11), "12");
    }

    #[test]
    fn test_labeling_letters() {
        assert_eq!(BinLabeling::Letters.label(0), "A");
        assert_eq!(BinLabeling::Letters.label(25), "Z");
        assert_eq!(BinLabeling::Letters.label(26), "AA");
    }

    #[test]
    fn test_validate_accepts_unique_aisles() {
        let structure = structure_with_configs(vec![
            AisleConfig {
                aisle_number: 1,
                shelves_count: 2,
                bins_per_shelf: 3,
            },
            AisleConfig {
                aisle_number: 2,
                shelves_count: 4,
                bins_per_shelf: 6,
            },
        ]);
        assert!(structure.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_aisle() {
        let structure = structure_with_configs(vec![
            AisleConfig {
                aisle_number: 2,
                shelves_count: 2,
                bins_per_shelf: 3,
            },
            AisleConfig {
                aisle_number: 2,
                shelves_count: 4,
                bins_per_shelf: 6,
            },
        ]);
        assert!(matches!(
            structure.validate(),
            Err(ZoneStructureError::DuplicateAisleNumber(2))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_aisle() {
        let structure = structure_with_configs(vec![AisleConfig {
            aisle_number: 0,
            shelves_count: 2,
            bins_per_shelf: 3,
        }]);
        assert!(matches!(
            structure.validate(),
            Err(ZoneStructureError::ZeroAisleNumber)
        ));
    }

    #[test]
    fn test_structure_serde_camel_case() {
        let structure = ZoneStructure {
            aisles: 2,
            shelves_per_aisle: 3,
            bins_per_shelf: 4,
            bin_labeling: BinLabeling::Letters,
            bin_direction: BinDirection::TopDown,
            aisle_configs: None,
        };
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["shelvesPerAisle"], 3);
        assert_eq!(json["binLabeling"], "LETTERS");
        assert_eq!(json["binDirection"], "TOP_DOWN");
    }
}
