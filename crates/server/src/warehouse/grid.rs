//! Address grid derivation.
//!
//! Turns a zone's structural configuration plus a flat list of bin
//! occupancy records into the nested aisle -> shelf -> slot matrix the
//! back-office renders. The configuration cascade is resolved exactly once
//! into a [`GridSource`] so the precedence order stays a visible, testable
//! function instead of implicit fallthrough.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use stockyard_core::{AisleConfig, BinDirection, BinLabeling, BinOccupancy, ZoneStructure};

/// Where the per-aisle shelf/bin counts came from.
///
/// Resolution precedence: explicit per-aisle overrides on the structure,
/// else inference from the observed bin records, else the structure's
/// uniform defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "aisles")]
pub enum GridSource {
    /// The structure carries per-aisle overrides.
    Explicit(Vec<AisleConfig>),
    /// Counts derived from the observed bins: per aisle, the maximum shelf
    /// number and the number of distinct positions.
    Inferred(Vec<AisleConfig>),
    /// The structure's uniform defaults applied to every aisle from 1.
    Uniform(Vec<AisleConfig>),
}

impl GridSource {
    /// Resolve the configuration cascade.
    ///
    /// Returns `None` when there is nothing to build from: no structure and
    /// no recorded bins. Inference never invents aisles the records do not
    /// reference.
    #[must_use]
    pub fn resolve(structure: Option<&ZoneStructure>, bins: &[BinOccupancy]) -> Option<Self> {
        if let Some(configs) = structure.and_then(|s| s.aisle_configs.as_ref())
            && !configs.is_empty()
        {
            return Some(Self::Explicit(configs.clone()));
        }

        if !bins.is_empty() {
            return Some(Self::Inferred(infer_configs(bins)));
        }

        structure.map(|s| {
            Self::Uniform(
                (1..=s.aisles)
                    .map(|aisle_number| AisleConfig {
                        aisle_number,
                        shelves_count: s.shelves_per_aisle,
                        bins_per_shelf: s.bins_per_shelf,
                    })
                    .collect(),
            )
        })
    }

    /// The per-aisle configs, in presentation order.
    #[must_use]
    pub fn aisle_configs(&self) -> &[AisleConfig] {
        match self {
            Self::Explicit(configs) | Self::Inferred(configs) | Self::Uniform(configs) => configs,
        }
    }
}

/// Group observed bins by aisle; shelves = max shelf seen, bins per shelf =
/// count of distinct positions seen.
fn infer_configs(bins: &[BinOccupancy]) -> Vec<AisleConfig> {
    let mut per_aisle: BTreeMap<u32, (u32, BTreeSet<String>)> = BTreeMap::new();
    for bin in bins {
        let entry = per_aisle.entry(bin.aisle).or_default();
        entry.0 = entry.0.max(bin.shelf);
        entry.1.insert(normalize_position(&bin.position));
    }
    per_aisle
        .into_iter()
        .map(|(aisle_number, (shelves_count, positions))| AisleConfig {
            aisle_number,
            shelves_count,
            bins_per_shelf: u32::try_from(positions.len()).unwrap_or(u32::MAX),
        })
        .collect()
}

/// One slot row of shelves for an aisle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleGrid {
    /// 1-based aisle number.
    pub aisle_number: u32,
    /// Shelves in presentation order (see [`BinDirection`]).
    pub shelves: Vec<ShelfRow>,
}

/// One shelf and its ordered bin slots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfRow {
    /// 1-based shelf number, counted from the bottom.
    pub shelf_number: u32,
    /// Slots in position order; `None` where no bin record exists for the
    /// coordinate.
    pub slots: Vec<Option<BinOccupancy>>,
}

/// A fully derived zone grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneGrid {
    /// Which branch of the configuration cascade produced the layout.
    pub source: GridSource,
    /// Aisles in presentation order.
    pub aisles: Vec<AisleGrid>,
}

/// Outcome of building a zone map.
#[derive(Debug, Clone)]
pub enum ZoneMap {
    /// No structure and no recorded bins; the zone was never set up. No
    /// synthetic bins are invented for this case.
    NotConfigured,
    /// The derived grid.
    Grid(ZoneGrid),
}

impl ZoneMap {
    /// Derive the zone map from a structure and the observed bins.
    #[must_use]
    pub fn build(structure: Option<&ZoneStructure>, bins: &[BinOccupancy]) -> Self {
        let Some(source) = GridSource::resolve(structure, bins) else {
            return Self::NotConfigured;
        };

        // Index all records by coordinate for O(1) slot lookup.
        let mut by_coordinate: HashMap<String, &BinOccupancy> = HashMap::new();
        for bin in bins {
            by_coordinate.insert(coordinate_key(bin.aisle, bin.shelf, &bin.position), bin);
        }

        let labeling = structure.map(|s| s.bin_labeling).unwrap_or_default();
        let direction = structure.map(|s| s.bin_direction).unwrap_or_default();

        let aisles = source
            .aisle_configs()
            .iter()
            .map(|config| AisleGrid {
                aisle_number: config.aisle_number,
                shelves: shelf_numbers(config.shelves_count, direction)
                    .map(|shelf_number| ShelfRow {
                        shelf_number,
                        slots: (0..config.bins_per_shelf)
                            .map(|k| {
                                let key = coordinate_key(
                                    config.aisle_number,
                                    shelf_number,
                                    &labeling.label(k),
                                );
                                by_coordinate.get(&key).map(|&bin| bin.clone())
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self::Grid(ZoneGrid { source, aisles })
    }

    /// The grid, if the zone is configured.
    #[must_use]
    pub const fn grid(&self) -> Option<&ZoneGrid> {
        match self {
            Self::NotConfigured => None,
            Self::Grid(grid) => Some(grid),
        }
    }
}

/// Shelf iteration order for one aisle.
fn shelf_numbers(count: u32, direction: BinDirection) -> Box<dyn Iterator<Item = u32>> {
    match direction {
        BinDirection::BottomUp => Box::new(1..=count),
        BinDirection::TopDown => Box::new((1..=count).rev()),
    }
}

/// Composite coordinate key. Numeric positions are normalized (leading
/// zeros stripped) so "03" and "3" address the same slot; letter positions
/// compare uppercase.
fn coordinate_key(aisle: u32, shelf: u32, position: &str) -> String {
    format!("{aisle}-{shelf}-{}", normalize_position(position))
}

fn normalize_position(position: &str) -> String {
    let trimmed = position.trim();
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() { "0" } else { stripped }.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::{BinAddress, BinId};

    fn bin(id: i64, aisle: u32, shelf: u32, position: &str) -> BinOccupancy {
        BinOccupancy {
            id: BinId::new(id),
            address: BinAddress::from_coords(aisle, shelf, position),
            aisle,
            shelf,
            position: position.to_string(),
            capacity: 10,
            current_occupancy: 5,
            is_blocked: false,
            item_count: 1,
        }
    }

    fn uniform_structure(aisles: u32, shelves: u32, bins: u32) -> ZoneStructure {
        ZoneStructure {
            aisles,
            shelves_per_aisle: shelves,
            bins_per_shelf: bins,
            bin_labeling: BinLabeling::Numbers,
            bin_direction: BinDirection::BottomUp,
            aisle_configs: None,
        }
    }

    #[test]
    fn test_resolve_prefers_explicit_configs() {
        let mut structure = uniform_structure(3, 4, 5);
        structure.aisle_configs = Some(vec![AisleConfig {
            aisle_number: 1,
            shelves_count: 2,
            bins_per_shelf: 2,
        }]);
        let bins = vec![bin(1, 1, 1, "1")];

        let source = GridSource::resolve(Some(&structure), &bins).unwrap();
        assert!(matches!(source, GridSource::Explicit(_)));
    }

    #[test]
    fn test_resolve_infers_when_no_explicit_configs() {
        let structure = uniform_structure(3, 4, 5);
        let bins = vec![bin(1, 2, 3, "1"), bin(2, 2, 1, "2")];

        let source = GridSource::resolve(Some(&structure), &bins).unwrap();
        let GridSource::Inferred(configs) = source else {
            panic!("expected inferred source");
        };
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].aisle_number, 2);
        assert_eq!(configs[0].shelves_count, 3);
        assert_eq!(configs[0].bins_per_shelf, 2);
    }

    #[test]
    fn test_resolve_uniform_fallback_without_bins() {
        let structure = uniform_structure(2, 3, 4);
        let source = GridSource::resolve(Some(&structure), &[]).unwrap();
        let GridSource::Uniform(configs) = source else {
            panic!("expected uniform source");
        };
        assert_eq!(configs.len(), 2);
        assert!(configs.iter().all(|c| c.shelves_count == 3));
        assert!(configs.iter().all(|c| c.bins_per_shelf == 4));
    }

    #[test]
    fn test_resolve_nothing_to_build_from() {
        assert!(GridSource::resolve(None, &[]).is_none());
        assert!(matches!(ZoneMap::build(None, &[]), ZoneMap::NotConfigured));
    }

    #[test]
    fn test_inference_never_invents_aisles() {
        let bins = vec![bin(1, 5, 1, "1")];
        let source = GridSource::resolve(None, &bins).unwrap();
        let aisles: Vec<u32> = source
            .aisle_configs()
            .iter()
            .map(|c| c.aisle_number)
            .collect();
        assert_eq!(aisles, vec![5]);
    }

    #[test]
    fn test_grid_completeness_uniform() {
        let structure = uniform_structure(2, 3, 4);
        let map = ZoneMap::build(Some(&structure), &[]);
        let grid = map.grid().unwrap();

        assert_eq!(grid.aisles.len(), 2);
        for aisle in &grid.aisles {
            assert_eq!(aisle.shelves.len(), 3);
            for shelf in &aisle.shelves {
                assert_eq!(shelf.slots.len(), 4);
                assert!(shelf.slots.iter().all(Option::is_none));
            }
        }
    }

    #[test]
    fn test_every_bin_lands_in_exactly_one_slot() {
        let structure = uniform_structure(2, 2, 3);
        let bins = vec![bin(1, 1, 1, "1"), bin(2, 1, 2, "3"), bin(3, 2, 1, "2")];
        let map = ZoneMap::build(Some(&structure), &bins);
        let grid = map.grid().unwrap();

        let placed: Vec<i64> = grid
            .aisles
            .iter()
            .flat_map(|a| &a.shelves)
            .flat_map(|s| &s.slots)
            .filter_map(|slot| slot.as_ref().map(|b| b.id.as_i64()))
            .collect();
        assert_eq!(placed.len(), 3);
        for id in [1, 2, 3] {
            assert_eq!(placed.iter().filter(|&&p| p == id).count(), 1);
        }
    }

    #[test]
    fn test_bin_lookup_matches_coordinates() {
        let structure = uniform_structure(1, 2, 2);
        let bins = vec![bin(7, 1, 2, "2")];
        let map = ZoneMap::build(Some(&structure), &bins);
        let grid = map.grid().unwrap();

        let shelf2 = grid.aisles[0]
            .shelves
            .iter()
            .find(|s| s.shelf_number == 2)
            .unwrap();
        assert_eq!(shelf2.slots[1].as_ref().unwrap().id, BinId::new(7));
        assert!(shelf2.slots[0].is_none());
    }

    #[test]
    fn test_zero_padded_positions_match_slots() {
        let structure = uniform_structure(1, 1, 3);
        let bins = vec![bin(4, 1, 1, "03")];
        let map = ZoneMap::build(Some(&structure), &bins);
        let grid = map.grid().unwrap();
        assert!(grid.aisles[0].shelves[0].slots[2].is_some());
    }

    #[test]
    fn test_letter_labeling() {
        let mut structure = uniform_structure(1, 1, 3);
        structure.bin_labeling = BinLabeling::Letters;
        let bins = vec![bin(1, 1, 1, "B")];
        let map = ZoneMap::build(Some(&structure), &bins);
        let grid = map.grid().unwrap();

        assert!(grid.aisles[0].shelves[0].slots[0].is_none());
        assert!(grid.aisles[0].shelves[0].slots[1].is_some());
        assert!(grid.aisles[0].shelves[0].slots[2].is_none());
    }

    #[test]
    fn test_top_down_shelf_order() {
        let mut structure = uniform_structure(1, 3, 1);
        structure.bin_direction = BinDirection::TopDown;
        let map = ZoneMap::build(Some(&structure), &[]);
        let grid = map.grid().unwrap();

        let order: Vec<u32> = grid.aisles[0]
            .shelves
            .iter()
            .map(|s| s.shelf_number)
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_bottom_up_shelf_order() {
        let structure = uniform_structure(1, 3, 1);
        let map = ZoneMap::build(Some(&structure), &[]);
        let grid = map.grid().unwrap();

        let order: Vec<u32> = grid.aisles[0]
            .shelves
            .iter()
            .map(|s| s.shelf_number)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_explicit_configs_drive_per_aisle_shape() {
        let mut structure = uniform_structure(2, 5, 5);
        structure.aisle_configs = Some(vec![
            AisleConfig {
                aisle_number: 1,
                shelves_count: 1,
                bins_per_shelf: 2,
            },
            AisleConfig {
                aisle_number: 4,
                shelves_count: 2,
                bins_per_shelf: 1,
            },
        ]);
        let map = ZoneMap::build(Some(&structure), &[]);
        let grid = map.grid().unwrap();

        assert_eq!(grid.aisles.len(), 2);
        assert_eq!(grid.aisles[0].aisle_number, 1);
        assert_eq!(grid.aisles[0].shelves.len(), 1);
        assert_eq!(grid.aisles[0].shelves[0].slots.len(), 2);
        assert_eq!(grid.aisles[1].aisle_number, 4);
        assert_eq!(grid.aisles[1].shelves.len(), 2);
        assert_eq!(grid.aisles[1].shelves[0].slots.len(), 1);
    }

    #[test]
    fn test_grid_completeness_inferred() {
        // Aisle 3 observed with shelves up to 2 and positions {1, 2}.
        let bins = vec![bin(1, 3, 2, "1"), bin(2, 3, 1, "2")];
        let map = ZoneMap::build(None, &bins);
        let grid = map.grid().unwrap();

        assert_eq!(grid.aisles.len(), 1);
        assert_eq!(grid.aisles[0].aisle_number, 3);
        assert_eq!(grid.aisles[0].shelves.len(), 2);
        for shelf in &grid.aisles[0].shelves {
            assert_eq!(shelf.slots.len(), 2);
        }
    }
}
