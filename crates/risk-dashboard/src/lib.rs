//! Dashboard Assembly
//!
//! Builds the presentational payloads for a selected district: tier summary,
//! tier-distribution bar chart, choropleth layer, and boundary highlight.
//! Everything here is derived from the read-only atlas; the only failure
//! mode is asking for a district the dataset does not contain.

use district_data::DistrictAtlas;
use serde::Serialize;
use thiserror::Error;

pub mod chart;
pub mod map;

pub use chart::{tier_distribution, TierBar, TierDistribution, TierSummary};
pub use map::{
    choropleth_layer, quantile_breaks, ChoroplethEntry, ChoroplethLayer, DistrictHighlight,
    MapView, DEFAULT_ZOOM, QUANTILE_PROBS, SEOUL_CENTER,
};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("'{0}'에 대한 데이터가 없습니다")]
    UnknownDistrict(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Complete dashboard payload for one selected district.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub district: String,
    pub tier: TierSummary,
    pub distribution: TierDistribution,
    pub map: MapView,
}

/// Assemble the dashboard for a selected district.
pub fn assemble_dashboard(atlas: &DistrictAtlas, district: &str) -> Result<DashboardView> {
    let record = atlas
        .get(district)
        .ok_or_else(|| DashboardError::UnknownDistrict(district.to_string()))?;

    let tier = TierSummary::from_label(&record.tier_label);
    let distribution = tier_distribution(&atlas.table, Some(&record.tier_label));
    let map = map::map_view(atlas, record);

    Ok(DashboardView {
        district: record.name.clone(),
        tier,
        distribution,
        map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use district_data::{BoundaryIndex, DistrictRecord, DistrictTable};

    fn record(name: &str, tier: &str, combined: f64) -> DistrictRecord {
        DistrictRecord {
            name: name.to_string(),
            adm_name: format!("서울특별시 테스트구 {}", name),
            tier_label: tier.to_string(),
            business_activation: 10.0,
            business_activation_sns: 1.0,
            gentrification: 5.0,
            gentrification_sns: 2.0,
            combined_score: combined,
        }
    }

    fn atlas() -> DistrictAtlas {
        let table = DistrictTable::new(vec![
            record("A", "주의", 4.5),
            record("B", "주의", 2.0),
            record("C", "일반", 1.0),
        ]);
        DistrictAtlas::new(table, BoundaryIndex::default())
    }

    #[test]
    fn test_selected_tier_is_summarized_and_highlighted() {
        let view = assemble_dashboard(&atlas(), "A").unwrap();
        assert_eq!(view.district, "A");
        assert_eq!(view.tier.label, "주의");
        assert_eq!(view.tier.display_label, "🟡 주의");
        assert!(view.tier.known);

        let highlighted: Vec<_> = view
            .distribution
            .bars
            .iter()
            .filter(|b| b.highlighted)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].label, "주의");
        assert_eq!(highlighted[0].count, 2);
    }

    #[test]
    fn test_unknown_district_is_an_error_not_a_panic() {
        let err = assemble_dashboard(&atlas(), "없는동").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownDistrict(_)));
        assert!(err.to_string().contains("없는동"));
    }

    #[test]
    fn test_missing_geometry_does_not_crash_assembly() {
        // the test atlas has no boundaries at all: highlight must be empty
        let view = assemble_dashboard(&atlas(), "A").unwrap();
        let highlight = view.map.highlight.expect("highlight entry present");
        assert!(highlight.geometry.is_none());
        assert!(highlight.centroid.is_none());
        assert_eq!(view.map.center, SEOUL_CENTER);
    }

    #[test]
    fn test_unmapped_tier_renders_sentinel() {
        let table = DistrictTable::new(vec![record("X", "미분류", 1.0)]);
        let atlas = DistrictAtlas::new(table, BoundaryIndex::default());
        let view = assemble_dashboard(&atlas, "X").unwrap();
        assert!(!view.tier.known);
        assert_eq!(view.tier.display_label, risk_tiers::UNKNOWN_TIER_DISPLAY);
    }
}
