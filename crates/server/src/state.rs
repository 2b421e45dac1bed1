//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use stockyard_core::{BinOccupancy, Zone, ZoneId};

use crate::config::ServerConfig;
use crate::inventory::{InventoryClient, InventoryError};

/// How long fetched zone records stay fresh.
const ZONE_CACHE_TTL: Duration = Duration::from_secs(300);
/// How long fetched bin lists stay fresh. Short, since occupancy moves.
const BINS_CACHE_TTL: Duration = Duration::from_secs(20);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    inventory: InventoryClient,
    zones: Cache<ZoneId, Arc<Zone>>,
    bins: Cache<ZoneId, Arc<Vec<BinOccupancy>>>,
}

impl AppState {
    /// Build state from configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let inventory = InventoryClient::new(config.inventory());
        Self::with_client(config, inventory)
    }

    /// Build state with an explicit client (used by integration tests).
    #[must_use]
    pub fn with_client(config: ServerConfig, inventory: InventoryClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                inventory,
                zones: Cache::builder()
                    .max_capacity(1_000)
                    .time_to_live(ZONE_CACHE_TTL)
                    .build(),
                bins: Cache::builder()
                    .max_capacity(1_000)
                    .time_to_live(BINS_CACHE_TTL)
                    .build(),
            }),
        }
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Returns a reference to the inventory backend client.
    #[must_use]
    pub fn inventory(&self) -> &InventoryClient {
        &self.inner.inventory
    }

    /// Fetch a zone, serving from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the backend call fails.
    pub async fn zone(&self, zone_id: ZoneId) -> Result<Arc<Zone>, InventoryError> {
        if let Some(zone) = self.inner.zones.get(&zone_id).await {
            return Ok(zone);
        }
        let zone = Arc::new(self.inner.inventory.get_zone(zone_id).await?);
        self.inner.zones.insert(zone_id, Arc::clone(&zone)).await;
        Ok(zone)
    }

    /// Fetch a zone's bin records, serving from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the backend call fails.
    pub async fn zone_bins(
        &self,
        zone_id: ZoneId,
    ) -> Result<Arc<Vec<BinOccupancy>>, InventoryError> {
        if let Some(bins) = self.inner.bins.get(&zone_id).await {
            return Ok(bins);
        }
        let bins = Arc::new(self.inner.inventory.list_bins(zone_id).await?);
        self.inner.bins.insert(zone_id, Arc::clone(&bins)).await;
        Ok(bins)
    }

    /// Drop all cached bin lists.
    ///
    /// Called after a successful move: the target address may live in a
    /// different zone than the source, so every cached list is suspect.
    pub fn invalidate_bins(&self) {
        self.inner.bins.invalidate_all();
    }
}
