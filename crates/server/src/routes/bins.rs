//! Bin detail and item move route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockyard_core::{BinAddress, BinId, BinItem, BinItemId, BinOccupancy, ZoneId};

use crate::error::AppError;
use crate::state::AppState;
use crate::warehouse::{FillBand, MovePlan, fill_percent, plan_move};

// =============================================================================
// Router
// =============================================================================

/// Build the bins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zones/{zone_id}/bins/{bin_id}", get(bin_detail))
        .route("/zones/{zone_id}/bins/{bin_id}/moves", post(move_item))
}

// =============================================================================
// Requests / Responses
// =============================================================================

/// Bin detail response with lazily fetched items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinDetailResponse {
    #[serde(flatten)]
    pub bin: BinOccupancy,
    pub fill_percent: u8,
    pub fill_band: FillBand,
    pub items: Vec<BinItem>,
}

/// Request body for moving item quantity out of a bin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub item_id: i64,
    pub target_address: String,
    pub quantity: i64,
}

/// Result of a successful move. The caller refreshes bin/item data for both
/// addresses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub moved_quantity: i64,
    /// Units left at the source; zero for a full move.
    pub remaining_quantity: i64,
    pub target_address: BinAddress,
}

// =============================================================================
// Handlers
// =============================================================================

/// Look up a bin inside its zone's record list.
async fn find_bin(
    state: &AppState,
    zone_id: ZoneId,
    bin_id: BinId,
) -> Result<BinOccupancy, AppError> {
    let bins = state.zone_bins(zone_id).await?;
    bins.iter()
        .find(|b| b.id == bin_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("bin {bin_id} in zone {zone_id}")))
}

/// GET /zones/{zone_id}/bins/{bin_id} - Bin detail with contained items.
#[instrument(skip(state))]
pub async fn bin_detail(
    State(state): State<AppState>,
    Path((zone_id, bin_id)): Path<(i64, i64)>,
) -> Result<Json<BinDetailResponse>, AppError> {
    let bin = find_bin(&state, ZoneId::new(zone_id), BinId::new(bin_id)).await?;
    let items = state.inventory().get_bin_items(bin.id).await?;

    Ok(Json(BinDetailResponse {
        fill_percent: fill_percent(bin.capacity, bin.current_occupancy),
        fill_band: FillBand::of_bin(&bin),
        bin,
        items,
    }))
}

/// POST /zones/{zone_id}/bins/{bin_id}/moves - Move item quantity to
/// another bin.
///
/// Validation (same-bin target, quantity bounds) happens before the backend
/// is called; on backend failure no local state changes and the error is
/// surfaced once.
#[instrument(skip(state, body))]
pub async fn move_item(
    State(state): State<AppState>,
    Path((zone_id, bin_id)): Path<(i64, i64)>,
    Json(body): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let source = find_bin(&state, ZoneId::new(zone_id), BinId::new(bin_id)).await?;

    let target_address =
        BinAddress::parse(&body.target_address).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Revalidate against freshly fetched items rather than caller state.
    let item_id = BinItemId::new(body.item_id);
    let items = state.inventory().get_bin_items(source.id).await?;
    let item = items
        .iter()
        .find(|i| i.id == item_id)
        .ok_or_else(|| AppError::NotFound(format!("item {item_id} in bin {}", source.id)))?;

    let plan = plan_move(&source, item, &target_address, body.quantity)?;

    state
        .inventory()
        .move_item(source.id, item.id, &target_address, body.quantity)
        .await?;

    // Occupancy changed in up to two zones; drop every cached bin list.
    state.invalidate_bins();

    let remaining_quantity = match plan {
        MovePlan::Full => 0,
        MovePlan::Partial { remaining } => remaining,
    };

    Ok(Json(MoveResponse {
        moved_quantity: body.quantity,
        remaining_quantity,
        target_address,
    }))
}
