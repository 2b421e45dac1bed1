//! Zone route handlers.
//!
//! Serves the zone list and the derived zone map: the aisle/shelf/slot grid
//! with per-bin fill classification, filter verdicts, and highlighting.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockyard_core::{BinId, BinOccupancy, Zone, ZoneId};

use crate::error::AppError;
use crate::state::AppState;
use crate::warehouse::{
    BinFilter, FillBand, GridSource, HighlightSpec, OccupancySummary, ZoneMap, fill_percent,
};

// =============================================================================
// Router
// =============================================================================

/// Build the zones router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zones", get(zones_index))
        .route("/zones/{zone_id}/map", get(zone_map))
}

// =============================================================================
// Responses
// =============================================================================

/// Zone list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesResponse {
    pub zones: Vec<ZoneSummary>,
}

/// One zone with its occupancy summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    #[serde(flatten)]
    pub zone: Zone,
    pub configured: bool,
}

/// Query parameters for the zone map.
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    /// Categorical filter: all, empty, occupied, full, blocked.
    pub filter: Option<String>,
    /// Address search substring for highlighting.
    pub q: Option<String>,
    /// Bin ID to highlight (deep link).
    pub highlight: Option<i64>,
}

/// Derived zone map response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMapResponse {
    pub zone: Zone,
    /// False when the zone has no structure and no recorded bins; the grid
    /// is empty and the frontend renders its "not configured" state.
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<GridSource>,
    pub aisles: Vec<AisleView>,
    pub summary: OccupancySummary,
    pub filter: BinFilter,
}

/// One aisle of the rendered grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleView {
    pub aisle_number: u32,
    pub shelves: Vec<ShelfView>,
}

/// One shelf row of the rendered grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfView {
    pub shelf_number: u32,
    pub slots: Vec<Option<BinCell>>,
}

/// One classified bin slot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinCell {
    #[serde(flatten)]
    pub bin: BinOccupancy,
    pub fill_percent: u8,
    pub fill_band: FillBand,
    pub matches_filter: bool,
    pub highlighted: bool,
}

impl BinCell {
    /// Classify one bin against the active filter and highlight spec.
    fn classify(bin: BinOccupancy, filter: BinFilter, highlight: &HighlightSpec<'_>) -> Self {
        Self {
            fill_percent: fill_percent(bin.capacity, bin.current_occupancy),
            fill_band: FillBand::of_bin(&bin),
            matches_filter: filter.matches(&bin),
            highlighted: highlight.is_highlighted(&bin),
            bin,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /zones - List zones with configuration status.
#[instrument(skip(state))]
pub async fn zones_index(State(state): State<AppState>) -> Result<Json<ZonesResponse>, AppError> {
    let zones = state.inventory().list_zones().await?;
    let zones = zones
        .into_iter()
        .map(|zone| ZoneSummary {
            configured: zone.structure.is_some(),
            zone,
        })
        .collect();
    Ok(Json(ZonesResponse { zones }))
}

/// GET /zones/{zone_id}/map - Derive and classify the zone grid.
#[instrument(skip(state, params))]
pub async fn zone_map(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<MapQuery>,
) -> Result<Json<ZoneMapResponse>, AppError> {
    let zone_id = ZoneId::new(id);
    let filter = match params.filter.as_deref() {
        None => BinFilter::default(),
        Some(raw) => raw.parse::<BinFilter>().map_err(AppError::BadRequest)?,
    };
    let highlight = HighlightSpec {
        target: params.highlight.map(BinId::new),
        query: params.q.as_deref(),
    };

    let zone = state.zone(zone_id).await?;
    let bins = state.zone_bins(zone_id).await?;

    let map = ZoneMap::build(zone.structure.as_ref(), &bins);
    let summary = OccupancySummary::summarize(&bins);

    let (configured, source, aisles) = match map {
        ZoneMap::NotConfigured => (false, None, Vec::new()),
        ZoneMap::Grid(grid) => {
            let aisles = grid
                .aisles
                .into_iter()
                .map(|aisle| AisleView {
                    aisle_number: aisle.aisle_number,
                    shelves: aisle
                        .shelves
                        .into_iter()
                        .map(|shelf| ShelfView {
                            shelf_number: shelf.shelf_number,
                            slots: shelf
                                .slots
                                .into_iter()
                                .map(|slot| {
                                    slot.map(|bin| BinCell::classify(bin, filter, &highlight))
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect();
            (true, Some(grid.source), aisles)
        }
    };

    Ok(Json(ZoneMapResponse {
        zone: (*zone).clone(),
        configured,
        source,
        aisles,
        summary,
        filter,
    }))
}
