//! Item move mutation for the inventory backend.

use serde::Serialize;
use tracing::instrument;

use stockyard_core::{BinAddress, BinId, BinItemId};

use super::InventoryError;
use super::client::InventoryClient;

/// Request body for moving item quantity between bins.
///
/// The backend decrements the source item record; a full-quantity move
/// relocates the record to the target bin, a partial move splits it (the
/// remainder stays at the source).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveItemRequest<'a> {
    item_id: BinItemId,
    target_address: &'a BinAddress,
    quantity: i64,
}

impl InventoryClient {
    /// Move `quantity` units of an item from `source_bin` to the bin at
    /// `target_address`.
    ///
    /// Local preconditions (target differs from source, quantity within
    /// bounds) are the caller's responsibility; this method only performs
    /// the delegated mutation.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if the backend rejects or fails the move.
    /// No local state is mutated on failure.
    #[instrument(skip(self), fields(source_bin = %source_bin, item_id = %item_id, quantity))]
    pub async fn move_item(
        &self,
        source_bin: BinId,
        item_id: BinItemId,
        target_address: &BinAddress,
        quantity: i64,
    ) -> Result<(), InventoryError> {
        let request = MoveItemRequest {
            item_id,
            target_address,
            quantity,
        };
        self.post_unit(&format!("bins/{source_bin}/moves"), &request)
            .await
    }
}
