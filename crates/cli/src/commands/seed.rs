//! Generate demo fixture data.
//!
//! Produces a `fixtures.json` with a handful of zones exercising every
//! structural shape the grid builder handles: uniform numbered layouts,
//! lettered top-down layouts, per-aisle overrides, and an unconfigured
//! zone. Bins get randomized occupancy; an in-progress cycle carries counts
//! in every reachable state.

use std::path::Path;

use chrono::Utc;
use rand::Rng;
use tracing::info;

use stockyard_core::{
    AisleConfig, BinAddress, BinDirection, BinId, BinItem, BinItemId, BinLabeling, BinOccupancy,
    CountId, CountStatus, CycleId, CycleStatus, InventoryCount, InventoryCycle, Zone, ZoneId,
    ZoneStructure,
};
use stockyard_server::warehouse::reconcile;

use crate::fixtures::Fixtures;

/// Generate fixtures into `<out>/fixtures.json`.
///
/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn run(out: &Path, zones: u32, fill: u8) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Builder::new(fill);

    builder.zone(
        "Pick Zone A",
        "PICK-A",
        Some(ZoneStructure {
            aisles: 4,
            shelves_per_aisle: 5,
            bins_per_shelf: 6,
            bin_labeling: BinLabeling::Numbers,
            bin_direction: BinDirection::BottomUp,
            aisle_configs: None,
        }),
    );
    builder.zone(
        "Bulk Reserve",
        "BULK",
        Some(ZoneStructure {
            aisles: 2,
            shelves_per_aisle: 3,
            bins_per_shelf: 4,
            bin_labeling: BinLabeling::Letters,
            bin_direction: BinDirection::TopDown,
            aisle_configs: Some(vec![
                AisleConfig {
                    aisle_number: 1,
                    shelves_count: 3,
                    bins_per_shelf: 4,
                },
                AisleConfig {
                    aisle_number: 2,
                    shelves_count: 2,
                    bins_per_shelf: 6,
                },
            ]),
        }),
    );
    builder.zone("Receiving", "RCV", None);

    for extra in 3..zones {
        builder.zone(
            &format!("Overflow {}", extra - 2),
            &format!("OVF-{}", extra - 2),
            Some(ZoneStructure {
                aisles: 3,
                shelves_per_aisle: 4,
                bins_per_shelf: 5,
                bin_labeling: BinLabeling::Numbers,
                bin_direction: BinDirection::BottomUp,
                aisle_configs: None,
            }),
        );
    }

    builder.cycles();

    let fixtures = builder.finish();
    let path = fixtures.store(out)?;
    info!(
        path = %path.display(),
        zones = fixtures.zones.len(),
        bins = fixtures.bins.values().map(Vec::len).sum::<usize>(),
        cycles = fixtures.cycles.len(),
        "Fixtures written"
    );
    Ok(())
}

struct Builder {
    fill: u8,
    rng: rand::rngs::ThreadRng,
    fixtures: Fixtures,
    next_bin_id: i64,
    next_item_id: i64,
}

impl Builder {
    fn new(fill: u8) -> Self {
        Self {
            fill: fill.min(100),
            rng: rand::rng(),
            fixtures: Fixtures::default(),
            next_bin_id: 1,
            next_item_id: 1,
        }
    }

    fn zone(&mut self, name: &str, code: &str, structure: Option<ZoneStructure>) {
        let zone_id = ZoneId::new(i64::try_from(self.fixtures.zones.len()).unwrap_or(0) + 1);
        let mut bins = Vec::new();

        if let Some(structure) = &structure {
            let configs: Vec<AisleConfig> = structure.aisle_configs.clone().unwrap_or_else(|| {
                (1..=structure.aisles)
                    .map(|aisle_number| AisleConfig {
                        aisle_number,
                        shelves_count: structure.shelves_per_aisle,
                        bins_per_shelf: structure.bins_per_shelf,
                    })
                    .collect()
            });

            for config in configs {
                for shelf in 1..=config.shelves_count {
                    for k in 0..config.bins_per_shelf {
                        if self.rng.random_range(0..100) >= self.fill {
                            continue;
                        }
                        let position = structure.bin_labeling.label(k);
                        bins.push(self.bin(config.aisle_number, shelf, &position));
                    }
                }
            }
        }

        for bin in &bins {
            if bin.current_occupancy > 0 {
                let items = self.items_for(bin);
                self.fixtures.items.insert(bin.id.as_i64(), items);
            }
        }

        self.fixtures.bins.insert(zone_id.as_i64(), bins);
        self.fixtures.zones.push(Zone {
            id: zone_id,
            name: name.to_string(),
            code: code.to_string(),
            structure,
        });
    }

    fn bin(&mut self, aisle: u32, shelf: u32, position: &str) -> BinOccupancy {
        let capacity = i64::from(self.rng.random_range(20..=50_u32));
        let current_occupancy = self.rng.random_range(0..=capacity);
        let id = BinId::new(self.next_bin_id);
        self.next_bin_id += 1;

        BinOccupancy {
            id,
            address: BinAddress::from_coords(aisle, shelf, position),
            aisle,
            shelf,
            position: position.to_string(),
            capacity,
            current_occupancy,
            is_blocked: self.rng.random_range(0..100) < 5,
            item_count: u32::from(current_occupancy > 0),
        }
    }

    fn items_for(&mut self, bin: &BinOccupancy) -> Vec<BinItem> {
        let id = BinItemId::new(self.next_item_id);
        self.next_item_id += 1;

        vec![BinItem {
            id,
            item_code: format!("ITM-{:04}", id.as_i64()),
            product_name: format!("Demo product {}", id.as_i64()),
            variant_name: None,
            sku: format!("SKU-{:04}", id.as_i64()),
            quantity: bin.current_occupancy,
            unit_label: "pcs".to_string(),
        }]
    }

    /// One draft cycle plus one in-progress cycle with counts in every
    /// reachable state.
    fn cycles(&mut self) {
        let now = Utc::now();
        let scope: Vec<BinOccupancy> = self
            .fixtures
            .bins
            .get(&1)
            .map(|bins| bins.iter().take(6).cloned().collect())
            .unwrap_or_default();
        let total = u32::try_from(scope.len()).unwrap_or(0);

        self.fixtures.cycles.push(InventoryCycle {
            id: CycleId::new(1),
            name: "Monthly full count".to_string(),
            status: CycleStatus::Draft,
            total_bins: total,
            counted_bins: 0,
            adjusted_bins: 0,
            created_at: now,
            started_at: None,
            completed_at: None,
        });

        let mut cycle = InventoryCycle {
            id: CycleId::new(2),
            name: "Weekly recount".to_string(),
            status: CycleStatus::InProgress,
            total_bins: total,
            counted_bins: 0,
            adjusted_bins: 0,
            created_at: now,
            started_at: Some(now),
            completed_at: None,
        };

        let mut counts = Vec::new();
        for (index, bin) in scope.iter().enumerate() {
            let pending = InventoryCount {
                id: CountId::new(i64::try_from(index).unwrap_or(0) + 1),
                cycle_id: cycle.id,
                bin_id: bin.id,
                status: CountStatus::Pending,
                expected_quantity: bin.current_occupancy,
                counted_quantity: None,
                variance: None,
                counted_at: None,
                adjusted_at: None,
            };

            // Leave a third pending, count a third exactly, and give the
            // rest a variance; adjust every other variance.
            let count = match index % 3 {
                0 => pending,
                1 => {
                    let exact = pending.expected_quantity;
                    reconcile::record_count(&pending, exact, now).unwrap_or(pending)
                }
                _ => {
                    let off = (pending.expected_quantity - 2).max(0);
                    let counted =
                        reconcile::record_count(&pending, off, now).unwrap_or(pending);
                    if index % 2 == 0 {
                        reconcile::record_adjustment(&counted, now).unwrap_or(counted)
                    } else {
                        counted
                    }
                }
            };

            if count.status != CountStatus::Pending {
                cycle = reconcile::note_counted(&cycle);
            }
            if count.status == CountStatus::Adjusted {
                cycle = reconcile::note_adjusted(&cycle);
            }
            counts.push(count);
        }

        self.fixtures.counts.insert(cycle.id.as_i64(), counts);
        self.fixtures.cycles.push(cycle);
    }

    fn finish(self) -> Fixtures {
        self.fixtures
    }
}
