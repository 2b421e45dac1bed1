//! Inventory cycle route handlers.
//!
//! Wires the pure reconciliation state machine to the backend: every
//! transition is gated locally (status checks, input validation) before the
//! delegated mutation, and responses carry the derived fields the
//! back-office renders (progress, variance, available actions).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockyard_core::{CountId, CycleId, InventoryCount, InventoryCycle};

use crate::error::AppError;
use crate::state::AppState;
use crate::warehouse::reconcile::{
    self, CountAction, available_actions, parse_counted_quantity,
};
use crate::warehouse::CompletionPlan;

// =============================================================================
// Router
// =============================================================================

/// Build the cycles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cycles", get(cycles_index))
        .route("/cycles/{cycle_id}", get(cycle_detail))
        .route("/cycles/{cycle_id}/start", post(start_cycle))
        .route("/cycles/{cycle_id}/counts/{count_id}", post(submit_count))
        .route("/cycles/{cycle_id}/counts/{count_id}/adjust", post(adjust_count))
        .route("/cycles/{cycle_id}/counts/{count_id}/verify", post(verify_count))
        .route("/cycles/{cycle_id}/complete", post(complete_cycle))
        .route("/cycles/{cycle_id}/cancel", post(cancel_cycle))
}

// =============================================================================
// Requests / Responses
// =============================================================================

/// One cycle with derived progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleView {
    #[serde(flatten)]
    pub cycle: InventoryCycle,
    pub progress_percent: u8,
}

impl From<InventoryCycle> for CycleView {
    fn from(cycle: InventoryCycle) -> Self {
        Self {
            progress_percent: cycle.progress_percent(),
            cycle,
        }
    }
}

/// One count record with the actions its status permits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountView {
    #[serde(flatten)]
    pub count: InventoryCount,
    pub available_actions: Vec<CountAction>,
}

impl From<InventoryCount> for CountView {
    fn from(count: InventoryCount) -> Self {
        Self {
            available_actions: available_actions(&count),
            count,
        }
    }
}

/// Cycle list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclesResponse {
    pub cycles: Vec<CycleView>,
}

/// Cycle detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDetailResponse {
    #[serde(flatten)]
    pub cycle: CycleView,
    pub counts: Vec<CountView>,
}

/// Request body for submitting a counted quantity.
///
/// The quantity arrives as the raw form value (number or string) and is
/// validated before any backend call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCountRequest {
    #[serde(default)]
    pub counted_quantity: serde_json::Value,
}

/// Request body for completing a cycle.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    /// Resolve all outstanding non-zero-variance counts as part of
    /// completion.
    #[serde(default)]
    pub auto_adjust: bool,
    /// Set after the operator has seen the uncounted-bins warning.
    #[serde(default)]
    pub acknowledge_uncounted: bool,
}

/// Completion response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    #[serde(flatten)]
    pub cycle: CycleView,
    /// Counts that `autoAdjust` resolved.
    pub adjusted: Vec<CountView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /cycles - List inventory cycles with progress.
#[instrument(skip(state))]
pub async fn cycles_index(State(state): State<AppState>) -> Result<Json<CyclesResponse>, AppError> {
    let cycles = state.inventory().list_cycles().await?;
    Ok(Json(CyclesResponse {
        cycles: cycles.into_iter().map(CycleView::from).collect(),
    }))
}

/// GET /cycles/{cycle_id} - Cycle detail with counts and per-count actions.
#[instrument(skip(state))]
pub async fn cycle_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CycleDetailResponse>, AppError> {
    let cycle_id = CycleId::new(id);
    let cycle = state.inventory().get_cycle(cycle_id).await?;
    let counts = state.inventory().get_counts(cycle_id).await?;

    Ok(Json(CycleDetailResponse {
        cycle: cycle.into(),
        counts: counts.into_iter().map(CountView::from).collect(),
    }))
}

/// POST /cycles/{cycle_id}/start - Begin counting a draft cycle.
#[instrument(skip(state))]
pub async fn start_cycle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CycleDetailResponse>, AppError> {
    let cycle_id = CycleId::new(id);
    let cycle = state.inventory().get_cycle(cycle_id).await?;

    // Reject before the backend call if the status forbids the transition.
    reconcile::start_cycle(&cycle, chrono::Utc::now())?;

    let outcome = state.inventory().start_cycle(cycle_id).await?;
    Ok(Json(CycleDetailResponse {
        cycle: outcome.cycle.into(),
        counts: outcome.counts.into_iter().map(CountView::from).collect(),
    }))
}

/// Find one count record within a cycle.
async fn find_count(
    state: &AppState,
    cycle_id: CycleId,
    count_id: CountId,
) -> Result<InventoryCount, AppError> {
    let counts = state.inventory().get_counts(cycle_id).await?;
    counts
        .into_iter()
        .find(|c| c.id == count_id)
        .ok_or_else(|| AppError::NotFound(format!("count {count_id} in cycle {cycle_id}")))
}

/// POST /cycles/{cycle_id}/counts/{count_id} - Submit a counted quantity.
#[instrument(skip(state, body))]
pub async fn submit_count(
    State(state): State<AppState>,
    Path((id, count_id)): Path<(i64, i64)>,
    Json(body): Json<SubmitCountRequest>,
) -> Result<Json<CountView>, AppError> {
    let cycle_id = CycleId::new(id);
    let count_id = CountId::new(count_id);

    // Empty or non-numeric input never reaches the backend.
    let counted_quantity = parse_counted_quantity(&body.counted_quantity)?;

    let count = find_count(&state, cycle_id, count_id).await?;
    reconcile::record_count(&count, counted_quantity, chrono::Utc::now())?;

    let updated = state
        .inventory()
        .submit_count(cycle_id, count_id, counted_quantity)
        .await?;
    Ok(Json(updated.into()))
}

/// POST /cycles/{cycle_id}/counts/{count_id}/adjust - Commit a stock adjustment
/// equal to the variance.
#[instrument(skip(state))]
pub async fn adjust_count(
    State(state): State<AppState>,
    Path((id, count_id)): Path<(i64, i64)>,
) -> Result<Json<CountView>, AppError> {
    let cycle_id = CycleId::new(id);
    let count_id = CountId::new(count_id);

    let count = find_count(&state, cycle_id, count_id).await?;
    reconcile::record_adjustment(&count, chrono::Utc::now())?;

    let updated = state.inventory().adjust_count(cycle_id, count_id).await?;
    Ok(Json(updated.into()))
}

/// POST /cycles/{cycle_id}/counts/{count_id}/verify - Secondary confirmation.
#[instrument(skip(state))]
pub async fn verify_count(
    State(state): State<AppState>,
    Path((id, count_id)): Path<(i64, i64)>,
) -> Result<Json<CountView>, AppError> {
    let cycle_id = CycleId::new(id);
    let count_id = CountId::new(count_id);

    let count = find_count(&state, cycle_id, count_id).await?;
    reconcile::record_verification(&count)?;

    let updated = state.inventory().verify_count(cycle_id, count_id).await?;
    Ok(Json(updated.into()))
}

/// POST /cycles/{cycle_id}/complete - Complete an in-progress cycle.
///
/// When bins remain uncounted the operator must acknowledge the warning;
/// the first, unacknowledged request is rejected with the warning text.
#[instrument(skip(state, body))]
pub async fn complete_cycle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, AppError> {
    let cycle_id = CycleId::new(id);
    let cycle = state.inventory().get_cycle(cycle_id).await?;
    let counts = state.inventory().get_counts(cycle_id).await?;

    let plan: CompletionPlan = reconcile::plan_completion(&cycle, &counts, body.auto_adjust)?;
    if let Some(warning) = &plan.uncounted_warning
        && !body.acknowledge_uncounted
    {
        return Err(AppError::BadRequest(warning.clone()));
    }

    let outcome = state
        .inventory()
        .complete_cycle(cycle_id, body.auto_adjust)
        .await?;
    Ok(Json(CompleteResponse {
        cycle: outcome.cycle.into(),
        adjusted: outcome.adjusted.into_iter().map(CountView::from).collect(),
    }))
}

/// POST /cycles/{cycle_id}/cancel - Cancel a non-terminal cycle.
#[instrument(skip(state))]
pub async fn cancel_cycle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CycleView>, AppError> {
    let cycle_id = CycleId::new(id);
    let cycle = state.inventory().get_cycle(cycle_id).await?;
    reconcile::cancel_cycle(&cycle)?;

    let updated = state.inventory().cancel_cycle(cycle_id).await?;
    Ok(Json(updated.into()))
}
