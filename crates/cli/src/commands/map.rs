//! Render a zone grid as text.
//!
//! Uses the same grid builder and occupancy engine as the server, so what
//! prints here is exactly what the back-office renders.
//!
//! Cell legend: `-----` no bin record, `XXXX` blocked, `nnn%` fill
//! percentage, `.....` filtered out, `*` prefix highlighted.

use std::path::Path;

use thiserror::Error;

use stockyard_core::BinOccupancy;
use stockyard_server::warehouse::{BinFilter, HighlightSpec, OccupancySummary, ZoneMap, fill_percent};

use crate::fixtures::Fixtures;

/// Errors that can occur while rendering a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// No zone with the given code in the fixtures.
    #[error("no zone with code {0}")]
    UnknownZone(String),

    /// Filter string did not parse.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

/// Render the grid of the zone with code `zone_code`.
///
/// # Errors
///
/// Returns an error if the fixtures cannot be loaded, the zone code is
/// unknown, or the filter string is invalid.
pub fn run(
    fixtures_path: &Path,
    zone_code: &str,
    filter: Option<&str>,
    search: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = Fixtures::load(fixtures_path)?;

    let zone = fixtures
        .zones
        .iter()
        .find(|z| z.code.eq_ignore_ascii_case(zone_code))
        .ok_or_else(|| MapError::UnknownZone(zone_code.to_string()))?;

    let filter = match filter {
        None => BinFilter::default(),
        Some(raw) => raw
            .parse::<BinFilter>()
            .map_err(MapError::InvalidFilter)?,
    };
    let highlight = HighlightSpec {
        target: None,
        query: search,
    };

    let empty = Vec::new();
    let bins = fixtures.bins.get(&zone.id.as_i64()).unwrap_or(&empty);

    let map = ZoneMap::build(zone.structure.as_ref(), bins);
    let output = render(zone.code.as_str(), &map, bins, filter, &highlight);
    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn render(
    code: &str,
    map: &ZoneMap,
    bins: &[BinOccupancy],
    filter: BinFilter,
    highlight: &HighlightSpec<'_>,
) -> String {
    let Some(grid) = map.grid() else {
        return format!("Zone {code} is not configured (no structure, no recorded bins)");
    };

    let summary = OccupancySummary::summarize(bins);
    let mut out = format!(
        "Zone {code}: {} bins ({} empty, {} occupied, {} full, {} blocked)\n",
        summary.total_bins,
        summary.empty_bins,
        summary.occupied_bins,
        summary.full_bins,
        summary.blocked_bins
    );

    for aisle in &grid.aisles {
        out.push_str(&format!("\nAisle {}\n", aisle.aisle_number));
        for shelf in &aisle.shelves {
            out.push_str(&format!("  shelf {:>2} ", shelf.shelf_number));
            for slot in &shelf.slots {
                out.push(' ');
                out.push_str(&cell(slot.as_ref(), filter, highlight));
            }
            out.push('\n');
        }
    }
    out
}

fn cell(slot: Option<&BinOccupancy>, filter: BinFilter, highlight: &HighlightSpec<'_>) -> String {
    let Some(bin) = slot else {
        return "-----".to_string();
    };
    if !filter.matches(bin) {
        return ".....".to_string();
    }
    let marker = if highlight.is_highlighted(bin) { '*' } else { ' ' };
    if bin.is_blocked {
        return format!("{marker}XXXX");
    }
    format!(
        "{marker}{:>3}%",
        fill_percent(bin.capacity, bin.current_occupancy)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::{BinAddress, BinId, BinLabeling, BinDirection, ZoneStructure};

    fn bin(id: i64, aisle: u32, shelf: u32, position: &str, occupancy: i64) -> BinOccupancy {
        BinOccupancy {
            id: BinId::new(id),
            address: BinAddress::from_coords(aisle, shelf, position),
            aisle,
            shelf,
            position: position.to_string(),
            capacity: 10,
            current_occupancy: occupancy,
            is_blocked: false,
            item_count: 0,
        }
    }

    #[test]
    fn test_render_not_configured() {
        let rendered = render(
            "RCV",
            &ZoneMap::NotConfigured,
            &[],
            BinFilter::All,
            &HighlightSpec::default(),
        );
        assert!(rendered.contains("not configured"));
    }

    #[test]
    fn test_render_marks_missing_and_filtered() {
        let structure = ZoneStructure {
            aisles: 1,
            shelves_per_aisle: 1,
            bins_per_shelf: 3,
            bin_labeling: BinLabeling::Numbers,
            bin_direction: BinDirection::BottomUp,
            aisle_configs: None,
        };
        let bins = vec![bin(1, 1, 1, "1", 0), bin(2, 1, 1, "2", 5)];
        let map = ZoneMap::build(Some(&structure), &bins);

        // Empty filter keeps bin 1, hides bin 2, slot 3 has no record.
        let rendered = render("PICK-A", &map, &bins, BinFilter::Empty, &HighlightSpec::default());
        assert!(rendered.contains("  0%"));
        assert!(rendered.contains("...."));
        assert!(rendered.contains("----"));
    }
}
