//! Choropleth layer and district highlight.

use district_data::{DistrictAtlas, DistrictRecord, DistrictTable};
use geojson::Geometry;
use serde::Serialize;

/// Default map anchor: Seoul city center.
pub const SEOUL_CENTER: [f64; 2] = [37.5665, 126.9780];
pub const DEFAULT_ZOOM: u8 = 11;

/// Quantile probabilities used for the choropleth breakpoints.
pub const QUANTILE_PROBS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// One district's choropleth datum with its popup text.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethEntry {
    pub adm_name: String,
    pub combined_score: f64,
    pub popup: String,
}

/// The full choropleth layer: quantile breaks plus per-district values.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethLayer {
    pub breaks: Vec<f64>,
    pub entries: Vec<ChoroplethEntry>,
}

/// The selected district's overlay. All geometry fields are `None` when the
/// boundary join missed; the client then skips the overlay.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictHighlight {
    pub adm_name: String,
    pub geometry: Option<Geometry>,
    /// [lat, lon]
    pub centroid: Option<[f64; 2]>,
    pub popup: String,
}

/// Map payload: anchor, choropleth, and the selected-district overlay.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub choropleth: ChoroplethLayer,
    pub highlight: Option<DistrictHighlight>,
}

/// Quantile breakpoints with linear interpolation between order statistics
/// (the convention tabular tooling uses). Non-finite scores are ignored;
/// an empty input yields no breaks.
pub fn quantile_breaks(scores: &[f64], probs: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = scores.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    probs
        .iter()
        .map(|&q| {
            let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
            }
        })
        .collect()
}

fn popup_text(adm_name: &str, combined_score: f64) -> String {
    format!("{}<br>합산 지수: {:.2}", adm_name, combined_score)
}

/// Choropleth layer across the whole table.
pub fn choropleth_layer(table: &DistrictTable) -> ChoroplethLayer {
    let breaks = quantile_breaks(&table.combined_scores(), &QUANTILE_PROBS);
    let entries = table
        .records()
        .iter()
        .map(|r| ChoroplethEntry {
            adm_name: r.adm_name.clone(),
            combined_score: r.combined_score,
            popup: popup_text(&r.adm_name, r.combined_score),
        })
        .collect();
    ChoroplethLayer { breaks, entries }
}

/// Map payload for the selected district: choropleth plus highlight overlay,
/// recentered on the district's centroid when geometry is available.
pub fn map_view(atlas: &DistrictAtlas, record: &DistrictRecord) -> MapView {
    let boundary = atlas.boundary_for(record);
    let centroid = boundary
        .and_then(|b| b.centroid)
        .map(|(lat, lon)| [lat, lon]);
    let highlight = DistrictHighlight {
        adm_name: record.adm_name.clone(),
        geometry: boundary.map(|b| b.geometry.clone()),
        centroid,
        popup: record.name.clone(),
    };

    MapView {
        center: centroid.unwrap_or(SEOUL_CENTER),
        zoom: DEFAULT_ZOOM,
        choropleth: choropleth_layer(&atlas.table),
        highlight: Some(highlight),
    }
}
