//! In-memory mock of the inventory backend.
//!
//! Serves the same REST surface the server's `InventoryClient` consumes.
//! State transitions reuse `stockyard_server::warehouse::reconcile` so the
//! mock's behavior matches the state machine the server gates with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use stockyard_core::{
    BinAddress, BinDirection, BinId, BinItem, BinItemId, BinLabeling, BinOccupancy, CountId,
    CycleId, CycleStatus, InventoryCount, InventoryCycle, Zone, ZoneId, ZoneStructure,
};
use stockyard_server::warehouse::reconcile;

/// Shared mock state handle.
pub type SharedState = Arc<Mutex<BackendState>>;

/// The mock backend's in-memory records.
#[derive(Debug, Default)]
pub struct BackendState {
    pub zones: Vec<Zone>,
    /// Bin records keyed by zone ID.
    pub bins: HashMap<i64, Vec<BinOccupancy>>,
    /// Item records keyed by bin ID.
    pub items: HashMap<i64, Vec<BinItem>>,
    pub cycles: Vec<InventoryCycle>,
    /// Count records keyed by cycle ID.
    pub counts: HashMap<i64, Vec<InventoryCount>>,
    /// Bins each cycle covers, keyed by cycle ID.
    pub cycle_scopes: HashMap<i64, Vec<BinId>>,
    next_item_id: i64,
    next_count_id: i64,
}

impl BackendState {
    /// Deterministic demo state used by most tests.
    ///
    /// Zone 1 is a configured 2x2x3 grid with bins in every fill band plus
    /// a blocked bin; zone 2 is unconfigured and empty; zone 3 has bins but
    /// no structure, so its grid must be inferred.
    #[must_use]
    pub fn demo() -> Self {
        let mut state = Self {
            next_item_id: 100,
            next_count_id: 1,
            ..Self::default()
        };

        state.zones.push(Zone {
            id: ZoneId::new(1),
            name: "Pick Zone A".to_string(),
            code: "PICK-A".to_string(),
            structure: Some(ZoneStructure {
                aisles: 2,
                shelves_per_aisle: 2,
                bins_per_shelf: 3,
                bin_labeling: BinLabeling::Numbers,
                bin_direction: BinDirection::BottomUp,
                aisle_configs: None,
            }),
        });
        state.zones.push(Zone {
            id: ZoneId::new(2),
            name: "Receiving".to_string(),
            code: "RCV".to_string(),
            structure: None,
        });
        state.zones.push(Zone {
            id: ZoneId::new(3),
            name: "Bulk Reserve".to_string(),
            code: "BULK".to_string(),
            structure: None,
        });

        state.bins.insert(
            1,
            vec![
                demo_bin(1, 1, 1, "1", 10, 0, false),
                demo_bin(2, 1, 1, "2", 10, 5, false),
                demo_bin(3, 1, 2, "1", 10, 10, false),
                demo_bin(4, 2, 1, "3", 8, 2, true),
                demo_bin(5, 2, 2, "2", 0, 0, false),
            ],
        );
        state.bins.insert(2, Vec::new());
        state.bins.insert(
            3,
            vec![
                demo_bin(6, 1, 1, "1", 40, 12, false),
                demo_bin(7, 1, 2, "2", 40, 30, false),
            ],
        );

        state.items.insert(
            2,
            vec![demo_item(10, "ITM-0010", "Hex bolts M8", "HB-M8", 5)],
        );
        state.items.insert(
            3,
            vec![demo_item(11, "ITM-0011", "Washers 8mm", "WA-8", 10)],
        );
        state.items.insert(
            4,
            vec![demo_item(12, "ITM-0012", "Anchor plates", "AP-1", 2)],
        );
        state
            .items
            .insert(6, vec![demo_item(13, "ITM-0013", "Pallet wrap", "PW-3", 12)]);
        state.items.insert(
            7,
            vec![demo_item(14, "ITM-0014", "Strap rolls", "SR-2", 30)],
        );

        state.cycles.push(InventoryCycle {
            id: CycleId::new(1),
            name: "Weekly recount".to_string(),
            status: CycleStatus::Draft,
            total_bins: 3,
            counted_bins: 0,
            adjusted_bins: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        });
        state
            .cycle_scopes
            .insert(1, vec![BinId::new(2), BinId::new(3), BinId::new(4)]);

        state.cycles.push(InventoryCycle {
            id: CycleId::new(2),
            name: "Spot check".to_string(),
            status: CycleStatus::Draft,
            total_bins: 1,
            counted_bins: 0,
            adjusted_bins: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        });
        state.cycle_scopes.insert(2, vec![BinId::new(2)]);

        state
    }

    fn find_bin(&self, bin_id: BinId) -> Option<&BinOccupancy> {
        self.bins.values().flatten().find(|b| b.id == bin_id)
    }

    fn find_bin_mut(&mut self, bin_id: BinId) -> Option<&mut BinOccupancy> {
        self.bins.values_mut().flatten().find(|b| b.id == bin_id)
    }

    fn find_bin_by_address(&self, address: &BinAddress) -> Option<&BinOccupancy> {
        self.bins.values().flatten().find(|b| b.address == *address)
    }

    /// Apply a move the way the real backend would: decrement at the
    /// source, relocate or merge at the target, update both occupancies.
    fn apply_move(
        &mut self,
        source_bin_id: BinId,
        item_id: BinItemId,
        target_address: &BinAddress,
        quantity: i64,
    ) -> Result<(), (StatusCode, String)> {
        let target_bin_id = self
            .find_bin_by_address(target_address)
            .map(|b| b.id)
            .ok_or((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("no bin at address {target_address}"),
            ))?;

        let source_items = self.items.entry(source_bin_id.as_i64()).or_default();
        let index = source_items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or((StatusCode::NOT_FOUND, format!("item {item_id} not found")))?;

        let available = source_items[index].quantity;
        if quantity <= 0 || quantity > available {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("quantity must be between 1 and {available}"),
            ));
        }

        let moved = if quantity == available {
            // Full move: the record relocates entirely.
            source_items.remove(index)
        } else {
            source_items[index].quantity -= quantity;
            let source = &source_items[index];
            let record = BinItem {
                id: BinItemId::new(self.next_item_id),
                quantity,
                ..source.clone()
            };
            self.next_item_id += 1;
            record
        };

        let target_items = self.items.entry(target_bin_id.as_i64()).or_default();
        if let Some(existing) = target_items.iter_mut().find(|i| i.sku == moved.sku) {
            existing.quantity += moved.quantity;
        } else {
            target_items.push(moved);
        }

        let source_item_count =
            u32::try_from(self.items.get(&source_bin_id.as_i64()).map_or(0, Vec::len))
                .unwrap_or(u32::MAX);
        let target_item_count =
            u32::try_from(self.items.get(&target_bin_id.as_i64()).map_or(0, Vec::len))
                .unwrap_or(u32::MAX);

        if let Some(source) = self.find_bin_mut(source_bin_id) {
            source.current_occupancy = (source.current_occupancy - quantity).max(0);
            source.item_count = source_item_count;
        }
        if let Some(target) = self.find_bin_mut(target_bin_id) {
            target.current_occupancy += quantity;
            target.item_count = target_item_count;
        }
        Ok(())
    }
}

fn demo_bin(
    id: i64,
    aisle: u32,
    shelf: u32,
    position: &str,
    capacity: i64,
    occupancy: i64,
    blocked: bool,
) -> BinOccupancy {
    BinOccupancy {
        id: BinId::new(id),
        address: BinAddress::from_coords(aisle, shelf, position),
        aisle,
        shelf,
        position: position.to_string(),
        capacity,
        current_occupancy: occupancy,
        is_blocked: blocked,
        item_count: u32::from(occupancy > 0),
    }
}

fn demo_item(id: i64, code: &str, name: &str, sku: &str, quantity: i64) -> BinItem {
    BinItem {
        id: BinItemId::new(id),
        item_code: code.to_string(),
        product_name: name.to_string(),
        variant_name: None,
        sku: sku.to_string(),
        quantity,
        unit_label: "pcs".to_string(),
    }
}

/// Build the mock backend router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/zones", get(list_zones))
        .route("/zones/{id}", get(get_zone))
        .route("/zones/{id}/bins", get(list_bins))
        .route("/bins/{id}/items", get(list_items))
        .route("/bins/{id}/moves", post(move_item))
        .route("/cycles", get(list_cycles))
        .route("/cycles/{id}", get(get_cycle))
        .route("/cycles/{id}/counts", get(list_counts))
        .route("/cycles/{id}/start", post(start_cycle))
        .route("/cycles/{id}/counts/{count_id}", post(submit_count))
        .route("/cycles/{id}/counts/{count_id}/adjust", post(adjust_count))
        .route("/cycles/{id}/counts/{count_id}/verify", post(verify_count))
        .route("/cycles/{id}/complete", post(complete_cycle))
        .route("/cycles/{id}/cancel", post(cancel_cycle))
        .with_state(state)
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": what }))).into_response()
}

fn unprocessable(message: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message })),
    )
        .into_response()
}

async fn list_zones(State(state): State<SharedState>) -> Response {
    let state = state.lock().expect("mock state lock");
    Json(json!({ "items": state.zones })).into_response()
}

async fn get_zone(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("mock state lock");
    match state.zones.iter().find(|z| z.id.as_i64() == id) {
        Some(zone) => Json(zone).into_response(),
        None => not_found("zone not found"),
    }
}

async fn list_bins(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("mock state lock");
    if !state.zones.iter().any(|z| z.id.as_i64() == id) {
        return not_found("zone not found");
    }
    let bins = state.bins.get(&id).cloned().unwrap_or_default();
    Json(json!({ "items": bins })).into_response()
}

async fn list_items(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("mock state lock");
    if state.find_bin(BinId::new(id)).is_none() {
        return not_found("bin not found");
    }
    let items = state.items.get(&id).cloned().unwrap_or_default();
    Json(json!({ "items": items })).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    item_id: i64,
    target_address: String,
    quantity: i64,
}

async fn move_item(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<MoveBody>,
) -> Response {
    let Ok(target_address) = BinAddress::parse(&body.target_address) else {
        return unprocessable(format!("malformed address {}", body.target_address));
    };

    let mut state = state.lock().expect("mock state lock");
    if state.find_bin(BinId::new(id)).is_none() {
        return not_found("bin not found");
    }
    match state.apply_move(
        BinId::new(id),
        BinItemId::new(body.item_id),
        &target_address,
        body.quantity,
    ) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err((status, message)) => {
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

async fn list_cycles(State(state): State<SharedState>) -> Response {
    let state = state.lock().expect("mock state lock");
    Json(json!({ "items": state.cycles })).into_response()
}

async fn get_cycle(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("mock state lock");
    match state.cycles.iter().find(|c| c.id.as_i64() == id) {
        Some(cycle) => Json(cycle).into_response(),
        None => not_found("cycle not found"),
    }
}

async fn list_counts(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("mock state lock");
    if !state.cycles.iter().any(|c| c.id.as_i64() == id) {
        return not_found("cycle not found");
    }
    let counts = state.counts.get(&id).cloned().unwrap_or_default();
    Json(json!({ "items": counts })).into_response()
}

async fn start_cycle(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(index) = state.cycles.iter().position(|c| c.id.as_i64() == id) else {
        return not_found("cycle not found");
    };

    let started = match reconcile::start_cycle(&state.cycles[index], Utc::now()) {
        Ok(cycle) => cycle,
        Err(e) => return unprocessable(e.to_string()),
    };

    let scope = state.cycle_scopes.get(&id).cloned().unwrap_or_default();
    let mut counts = Vec::new();
    for bin_id in scope {
        let expected = state
            .find_bin(bin_id)
            .map_or(0, |b| b.current_occupancy);
        counts.push(InventoryCount {
            id: CountId::new(state.next_count_id),
            cycle_id: started.id,
            bin_id,
            status: stockyard_core::CountStatus::Pending,
            expected_quantity: expected,
            counted_quantity: None,
            variance: None,
            counted_at: None,
            adjusted_at: None,
        });
        state.next_count_id += 1;
    }

    state.cycles[index] = started.clone();
    state.counts.insert(id, counts.clone());
    Json(json!({ "cycle": started, "counts": counts })).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody {
    counted_quantity: i64,
}

async fn submit_count(
    State(state): State<SharedState>,
    Path((id, count_id)): Path<(i64, i64)>,
    Json(body): Json<SubmitBody>,
) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(cycle_index) = state.cycles.iter().position(|c| c.id.as_i64() == id) else {
        return not_found("cycle not found");
    };
    let Some(counts) = state.counts.get(&id) else {
        return not_found("count not found");
    };
    let Some(count_index) = counts.iter().position(|c| c.id.as_i64() == count_id) else {
        return not_found("count not found");
    };

    let current = state.counts[&id][count_index].clone();
    match reconcile::record_count(&current, body.counted_quantity, Utc::now()) {
        Ok(updated) => {
            state.cycles[cycle_index] = reconcile::note_counted(&state.cycles[cycle_index]);
            if let Some(counts) = state.counts.get_mut(&id) {
                counts[count_index] = updated.clone();
            }
            Json(updated).into_response()
        }
        Err(e) => unprocessable(e.to_string()),
    }
}

async fn adjust_count(
    State(state): State<SharedState>,
    Path((id, count_id)): Path<(i64, i64)>,
) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(cycle_index) = state.cycles.iter().position(|c| c.id.as_i64() == id) else {
        return not_found("cycle not found");
    };
    let Some(count_index) = state
        .counts
        .get(&id)
        .and_then(|counts| counts.iter().position(|c| c.id.as_i64() == count_id))
    else {
        return not_found("count not found");
    };

    let current = state.counts[&id][count_index].clone();
    match reconcile::record_adjustment(&current, Utc::now()) {
        Ok(updated) => {
            // Committing the adjustment moves the system quantity to the
            // counted quantity.
            let bin_id = updated.bin_id;
            let variance = updated.variance.unwrap_or(0);
            if let Some(bin) = state.find_bin_mut(bin_id) {
                bin.current_occupancy = (bin.current_occupancy + variance).max(0);
            }
            state.cycles[cycle_index] = reconcile::note_adjusted(&state.cycles[cycle_index]);
            if let Some(counts) = state.counts.get_mut(&id) {
                counts[count_index] = updated.clone();
            }
            Json(updated).into_response()
        }
        Err(e) => unprocessable(e.to_string()),
    }
}

async fn verify_count(
    State(state): State<SharedState>,
    Path((id, count_id)): Path<(i64, i64)>,
) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(count_index) = state
        .counts
        .get(&id)
        .and_then(|counts| counts.iter().position(|c| c.id.as_i64() == count_id))
    else {
        return not_found("count not found");
    };

    let current = state.counts[&id][count_index].clone();
    match reconcile::record_verification(&current) {
        Ok(updated) => {
            if let Some(counts) = state.counts.get_mut(&id) {
                counts[count_index] = updated.clone();
            }
            Json(updated).into_response()
        }
        Err(e) => unprocessable(e.to_string()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteBody {
    #[serde(default)]
    auto_adjust: bool,
}

async fn complete_cycle(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<CompleteBody>,
) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(cycle_index) = state.cycles.iter().position(|c| c.id.as_i64() == id) else {
        return not_found("cycle not found");
    };

    let counts = state.counts.get(&id).cloned().unwrap_or_default();
    let plan = match reconcile::plan_completion(&state.cycles[cycle_index], &counts, body.auto_adjust)
    {
        Ok(plan) => plan,
        Err(e) => return unprocessable(e.to_string()),
    };

    let mut adjusted = Vec::new();
    for target in plan.auto_adjust_targets {
        let Some(count_index) = state
            .counts
            .get(&id)
            .and_then(|counts| counts.iter().position(|c| c.id == target))
        else {
            continue;
        };
        let current = state.counts[&id][count_index].clone();
        if let Ok(updated) = reconcile::record_adjustment(&current, Utc::now()) {
            let bin_id = updated.bin_id;
            let variance = updated.variance.unwrap_or(0);
            if let Some(bin) = state.find_bin_mut(bin_id) {
                bin.current_occupancy = (bin.current_occupancy + variance).max(0);
            }
            state.cycles[cycle_index] = reconcile::note_adjusted(&state.cycles[cycle_index]);
            if let Some(counts) = state.counts.get_mut(&id) {
                counts[count_index] = updated.clone();
            }
            adjusted.push(updated);
        }
    }

    let mut completed = state.cycles[cycle_index].clone();
    completed.status = CycleStatus::Completed;
    completed.completed_at = Some(Utc::now());
    state.cycles[cycle_index] = completed.clone();

    Json(json!({ "cycle": completed, "adjusted": adjusted })).into_response()
}

async fn cancel_cycle(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    let Some(cycle_index) = state.cycles.iter().position(|c| c.id.as_i64() == id) else {
        return not_found("cycle not found");
    };

    match reconcile::cancel_cycle(&state.cycles[cycle_index]) {
        Ok(cancelled) => {
            state.cycles[cycle_index] = cancelled.clone();
            Json(cancelled).into_response()
        }
        Err(e) => unprocessable(e.to_string()),
    }
}
