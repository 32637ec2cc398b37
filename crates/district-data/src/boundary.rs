//! GeoJSON boundary loading
//!
//! Boundaries are rendering data only: geometry is carried through to map
//! payloads verbatim, and the centroid is precomputed for the highlight
//! marker. No spatial computation happens elsewhere.

use crate::{DataError, Result};
use geojson::{Feature, GeoJson, Geometry, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Feature property carrying the administrative district name.
pub const ADM_NAME_PROPERTY: &str = "adm_nm";

/// One district's boundary: geometry plus its precomputed centroid.
#[derive(Debug, Clone)]
pub struct DistrictBoundary {
    pub adm_name: String,
    pub geometry: Geometry,
    /// (latitude, longitude); `None` for degenerate geometry.
    pub centroid: Option<(f64, f64)>,
}

/// Boundaries keyed by administrative name.
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    map: HashMap<String, DistrictBoundary>,
}

impl BoundaryIndex {
    /// Load from a GeoJSON FeatureCollection. Features without an `adm_nm`
    /// property or without geometry are skipped, not rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading district boundaries from {:?}", path);

        let raw = fs::read_to_string(path)?;
        let geojson: GeoJson = raw.parse()?;
        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => return Err(DataError::NotAFeatureCollection(path.display().to_string())),
        };

        let mut index = BoundaryIndex::default();
        let mut skipped = 0;
        for feature in collection.features {
            match boundary_from_feature(feature) {
                Some(boundary) => {
                    index.map.insert(boundary.adm_name.clone(), boundary);
                }
                None => skipped += 1,
            }
        }

        info!(
            "Loaded {} boundaries ({} features skipped without name or geometry)",
            index.map.len(),
            skipped
        );
        Ok(index)
    }

    pub fn get(&self, adm_name: &str) -> Option<&DistrictBoundary> {
        self.map.get(adm_name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn boundary_from_feature(feature: Feature) -> Option<DistrictBoundary> {
    let adm_name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get(ADM_NAME_PROPERTY))
        .and_then(|v| v.as_str())?
        .to_string();
    let geometry = feature.geometry?;
    let centroid = geometry_centroid(&geometry);
    Some(DistrictBoundary {
        adm_name,
        geometry,
        centroid,
    })
}

/// Centroid of a polygonal geometry as (lat, lon).
///
/// Uses the area-weighted centroid of the exterior ring; for MultiPolygon,
/// the largest polygon wins. Degenerate rings fall back to the vertex mean.
pub fn geometry_centroid(geometry: &Geometry) -> Option<(f64, f64)> {
    match &geometry.value {
        Value::Polygon(rings) => rings.first().and_then(|ring| ring_centroid(ring)),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first().map(|ring| (ring_area(ring).abs(), ring)))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .and_then(|(_, ring)| ring_centroid(ring)),
        _ => None,
    }
}

fn ring_area(ring: &[Vec<f64>]) -> f64 {
    let mut area = 0.0;
    for pair in ring.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        area += a[0] * b[1] - b[0] * a[1];
    }
    area / 2.0
}

fn ring_centroid(ring: &[Vec<f64>]) -> Option<(f64, f64)> {
    if ring.len() < 3 {
        return None;
    }
    let area = ring_area(ring);
    if area.abs() < 1e-12 {
        // collapsed ring: vertex mean keeps the marker near the geometry
        let n = ring.len() as f64;
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        return Some((sy / n, sx / n));
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for pair in ring.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let cross = a[0] * b[1] - b[0] * a[1];
        cx += (a[0] + b[0]) * cross;
        cy += (a[1] + b[1]) * cross;
    }
    cx /= 6.0 * area;
    cy /= 6.0 * area;
    Some((cy, cx))
}
