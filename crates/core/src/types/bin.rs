//! Bin occupancy and stocked-item domain models.

use serde::{Deserialize, Serialize};

use super::address::BinAddress;
use super::id::{BinId, BinItemId};

/// One physical bin and its current occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinOccupancy {
    /// Unique bin ID.
    pub id: BinId,
    /// Human-readable address (e.g. "A-01-03").
    pub address: BinAddress,
    /// 1-based aisle number.
    pub aisle: u32,
    /// 1-based shelf number, counted from the bottom.
    pub shelf: u32,
    /// Position label within the shelf (numeric or letter per zone scheme).
    pub position: String,
    /// Unit capacity of the bin; non-positive means uncapacitated.
    pub capacity: i64,
    /// Units currently stored.
    pub current_occupancy: i64,
    /// Whether the bin is blocked for putaway/picking.
    pub is_blocked: bool,
    /// Number of distinct item records in the bin.
    pub item_count: u32,
}

impl BinOccupancy {
    /// Composite coordinate key, matching the grid builder's index.
    #[must_use]
    pub fn coordinate_key(&self) -> String {
        format!("{}-{}-{}", self.aisle, self.shelf, self.position)
    }
}

/// One stocked item inside a bin.
///
/// An item record is owned by exactly one bin at a time; moving a full
/// quantity relocates the record, moving a partial quantity splits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinItem {
    /// Unique item record ID.
    pub id: BinItemId,
    /// Internal item code.
    pub item_code: String,
    /// Product display name.
    pub product_name: String,
    /// Variant display name, if the product has variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    /// Stock-keeping unit.
    pub sku: String,
    /// Units of this item in the bin; always positive.
    pub quantity: i64,
    /// Unit label for display (e.g. "pcs", "kg").
    pub unit_label: String,
}
