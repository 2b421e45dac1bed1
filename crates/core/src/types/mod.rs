//! Core types for Stockyard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod bin;
pub mod cycle;
pub mod id;
pub mod status;
pub mod zone;

pub use address::{AddressError, BinAddress};
pub use bin::{BinItem, BinOccupancy};
pub use cycle::{InventoryCount, InventoryCycle};
pub use id::*;
pub use status::*;
pub use zone::{AisleConfig, BinDirection, BinLabeling, Zone, ZoneStructure, ZoneStructureError};
