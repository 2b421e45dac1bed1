//! Fixture bundle read and written by the CLI.
//!
//! The same file feeds local development mock backends and the `map`
//! command. Integer map keys serialize as JSON object keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use stockyard_core::{BinItem, BinOccupancy, InventoryCount, InventoryCycle, Zone};

/// Everything the demo backend needs, in one file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    pub zones: Vec<Zone>,
    /// Bin records keyed by zone ID.
    pub bins: BTreeMap<i64, Vec<BinOccupancy>>,
    /// Item records keyed by bin ID.
    pub items: BTreeMap<i64, Vec<BinItem>>,
    pub cycles: Vec<InventoryCycle>,
    /// Count records keyed by cycle ID.
    pub counts: BTreeMap<i64, Vec<InventoryCount>>,
}

impl Fixtures {
    /// Load fixtures from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write fixtures to `<dir>/fixtures.json`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn store(&self, dir: &Path) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("fixtures.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}
