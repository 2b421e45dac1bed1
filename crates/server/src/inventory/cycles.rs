//! Inventory cycle and count methods for the inventory backend.
//!
//! The backend owns the persisted cycle/count records; these methods submit
//! validated transitions and return the updated records.

use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;

use stockyard_core::{CountId, CycleId, InventoryCount, InventoryCycle};

use super::InventoryError;
use super::client::InventoryClient;
use super::zones::ItemsEnvelope;

/// Result of starting a cycle: the cycle moves to `IN_PROGRESS` and one
/// `PENDING` count per in-scope bin is initialized with the current system
/// quantity as its expected quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCycleOutcome {
    pub cycle: InventoryCycle,
    pub counts: Vec<InventoryCount>,
}

/// Result of completing a cycle. `adjusted` lists the counts that
/// `autoAdjust` resolved as part of completion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCycleOutcome {
    pub cycle: InventoryCycle,
    #[serde(default)]
    pub adjusted: Vec<InventoryCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitCountRequest {
    counted_quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteCycleRequest {
    auto_adjust: bool,
}

impl InventoryClient {
    /// List inventory cycles for the tenant.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the API call fails.
    #[instrument(skip(self))]
    pub async fn list_cycles(&self) -> Result<Vec<InventoryCycle>, InventoryError> {
        let envelope: ItemsEnvelope<InventoryCycle> = self.get_json("cycles").await?;
        Ok(envelope.items)
    }

    /// Get a single cycle by ID.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if the cycle does not exist.
    #[instrument(skip(self), fields(cycle_id = %cycle_id))]
    pub async fn get_cycle(&self, cycle_id: CycleId) -> Result<InventoryCycle, InventoryError> {
        self.get_json(&format!("cycles/{cycle_id}")).await
    }

    /// List the per-bin count records of a cycle.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the API call fails.
    #[instrument(skip(self), fields(cycle_id = %cycle_id))]
    pub async fn get_counts(
        &self,
        cycle_id: CycleId,
    ) -> Result<Vec<InventoryCount>, InventoryError> {
        let envelope: ItemsEnvelope<InventoryCount> =
            self.get_json(&format!("cycles/{cycle_id}/counts")).await?;
        Ok(envelope.items)
    }

    /// Start a draft cycle.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the cycle is missing or not in `DRAFT`.
    #[instrument(skip(self), fields(cycle_id = %cycle_id))]
    pub async fn start_cycle(
        &self,
        cycle_id: CycleId,
    ) -> Result<StartCycleOutcome, InventoryError> {
        self.post_mutation(&format!("cycles/{cycle_id}/start"), &serde_json::json!({}))
            .await
    }

    /// Submit a counted quantity for a pending count.
    ///
    /// The backend computes the variance and stamps `countedAt`.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the count is missing or not `PENDING`.
    #[instrument(skip(self), fields(cycle_id = %cycle_id, count_id = %count_id, counted_quantity))]
    pub async fn submit_count(
        &self,
        cycle_id: CycleId,
        count_id: CountId,
        counted_quantity: i64,
    ) -> Result<InventoryCount, InventoryError> {
        self.post_mutation(
            &format!("cycles/{cycle_id}/counts/{count_id}"),
            &SubmitCountRequest { counted_quantity },
        )
        .await
    }

    /// Commit a stock adjustment equal to the count's variance.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the count is not `COUNTED` with a
    /// non-zero variance.
    #[instrument(skip(self), fields(cycle_id = %cycle_id, count_id = %count_id))]
    pub async fn adjust_count(
        &self,
        cycle_id: CycleId,
        count_id: CountId,
    ) -> Result<InventoryCount, InventoryError> {
        self.post_mutation(
            &format!("cycles/{cycle_id}/counts/{count_id}/adjust"),
            &serde_json::json!({}),
        )
        .await
    }

    /// Mark a counted record as verified by a secondary confirmation pass.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the count is not `COUNTED`.
    #[instrument(skip(self), fields(cycle_id = %cycle_id, count_id = %count_id))]
    pub async fn verify_count(
        &self,
        cycle_id: CycleId,
        count_id: CountId,
    ) -> Result<InventoryCount, InventoryError> {
        self.post_mutation(
            &format!("cycles/{cycle_id}/counts/{count_id}/verify"),
            &serde_json::json!({}),
        )
        .await
    }

    /// Complete an in-progress cycle.
    ///
    /// With `auto_adjust` set, the backend resolves all outstanding
    /// non-zero-variance counted records to `ADJUSTED` as part of
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the cycle is not `IN_PROGRESS`.
    #[instrument(skip(self), fields(cycle_id = %cycle_id, auto_adjust))]
    pub async fn complete_cycle(
        &self,
        cycle_id: CycleId,
        auto_adjust: bool,
    ) -> Result<CompleteCycleOutcome, InventoryError> {
        self.post_mutation(
            &format!("cycles/{cycle_id}/complete"),
            &CompleteCycleRequest { auto_adjust },
        )
        .await
    }

    /// Cancel a non-terminal cycle.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the cycle is already terminal.
    #[instrument(skip(self), fields(cycle_id = %cycle_id))]
    pub async fn cancel_cycle(&self, cycle_id: CycleId) -> Result<InventoryCycle, InventoryError> {
        self.post_mutation(&format!("cycles/{cycle_id}/cancel"), &serde_json::json!({}))
            .await
    }
}
