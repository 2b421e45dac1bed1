//! Zone and bin query methods for the inventory backend.
//!
//! Provides methods to fetch zones with their structural configuration,
//! per-zone bin occupancy records, and the items stocked in a bin.

use serde::Deserialize;
use tracing::instrument;

use stockyard_core::{BinId, BinItem, BinOccupancy, Zone, ZoneId};

use super::InventoryError;
use super::client::InventoryClient;

/// Envelope for list responses from the backend.
#[derive(Debug, Deserialize)]
pub(super) struct ItemsEnvelope<T> {
    pub items: Vec<T>,
}

impl InventoryClient {
    /// List all zones visible to the tenant.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the API call fails.
    #[instrument(skip(self))]
    pub async fn list_zones(&self) -> Result<Vec<Zone>, InventoryError> {
        let envelope: ItemsEnvelope<Zone> = self.get_json("zones").await?;
        for zone in &envelope.items {
            validate_zone(zone)?;
        }
        Ok(envelope.items)
    }

    /// Get a single zone by ID.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if the zone does not exist, or
    /// `InventoryError::InvalidData` if its structure violates invariants.
    #[instrument(skip(self), fields(zone_id = %zone_id))]
    pub async fn get_zone(&self, zone_id: ZoneId) -> Result<Zone, InventoryError> {
        let zone: Zone = self.get_json(&format!("zones/{zone_id}")).await?;
        validate_zone(&zone)?;
        Ok(zone)
    }

    /// List the bin occupancy records of a zone.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the API call fails.
    #[instrument(skip(self), fields(zone_id = %zone_id))]
    pub async fn list_bins(&self, zone_id: ZoneId) -> Result<Vec<BinOccupancy>, InventoryError> {
        let envelope: ItemsEnvelope<BinOccupancy> =
            self.get_json(&format!("zones/{zone_id}/bins")).await?;
        Ok(envelope.items)
    }

    /// List the items stocked in a bin. May be empty.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the API call fails.
    #[instrument(skip(self), fields(bin_id = %bin_id))]
    pub async fn get_bin_items(&self, bin_id: BinId) -> Result<Vec<BinItem>, InventoryError> {
        let envelope: ItemsEnvelope<BinItem> =
            self.get_json(&format!("bins/{bin_id}/items")).await?;
        Ok(envelope.items)
    }
}

/// Reject zones whose structure violates invariants the grid builder relies
/// on (unique, positive aisle numbers in per-aisle overrides).
fn validate_zone(zone: &Zone) -> Result<(), InventoryError> {
    if let Some(structure) = &zone.structure {
        structure.validate().map_err(|e| {
            InventoryError::InvalidData(format!("zone {} structure: {e}", zone.id))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::{AisleConfig, BinDirection, BinLabeling, ZoneStructure};

    fn zone_with_configs(configs: Vec<AisleConfig>) -> Zone {
        Zone {
            id: ZoneId::new(1),
            name: "Pick zone".to_string(),
            code: "PICK-A".to_string(),
            structure: Some(ZoneStructure {
                aisles: 2,
                shelves_per_aisle: 3,
                bins_per_shelf: 4,
                bin_labeling: BinLabeling::Numbers,
                bin_direction: BinDirection::BottomUp,
                aisle_configs: Some(configs),
            }),
        }
    }

    #[test]
    fn test_validate_zone_rejects_duplicate_aisles() {
        let zone = zone_with_configs(vec![
            AisleConfig {
                aisle_number: 1,
                shelves_count: 2,
                bins_per_shelf: 2,
            },
            AisleConfig {
                aisle_number: 1,
                shelves_count: 3,
                bins_per_shelf: 3,
            },
        ]);
        assert!(matches!(
            validate_zone(&zone),
            Err(InventoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_validate_zone_accepts_valid_structure() {
        let zone = zone_with_configs(vec![AisleConfig {
            aisle_number: 1,
            shelves_count: 2,
            bins_per_shelf: 2,
        }]);
        assert!(validate_zone(&zone).is_ok());
    }

    #[test]
    fn test_validate_zone_accepts_unconfigured() {
        let zone = Zone {
            id: ZoneId::new(2),
            name: "Receiving".to_string(),
            code: "RCV".to_string(),
            structure: None,
        };
        assert!(validate_zone(&zone).is_ok());
    }
}
