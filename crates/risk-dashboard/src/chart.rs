//! Tier summary and distribution bar chart series.

use district_data::DistrictTable;
use risk_tiers::{RiskTier, Severity};
use serde::Serialize;

/// Tier information for the selected district. A mapping miss (or a district
/// absent from the dataset) yields the "no information" sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub label: String,
    pub display_label: String,
    pub description: String,
    pub severity: Option<Severity>,
    /// False when the label fell outside the seven-tier taxonomy.
    pub known: bool,
}

impl TierSummary {
    pub fn from_label(label: &str) -> Self {
        match RiskTier::from_label(label) {
            Some(tier) => TierSummary {
                label: label.to_string(),
                display_label: tier.display_label(),
                description: tier.description().to_string(),
                severity: Some(tier.severity()),
                known: true,
            },
            None => TierSummary {
                label: label.to_string(),
                display_label: risk_tiers::UNKNOWN_TIER_DISPLAY.to_string(),
                description: risk_tiers::UNKNOWN_TIER_DESCRIPTION.to_string(),
                severity: None,
                known: false,
            },
        }
    }

    /// Sentinel summary for a district with no dataset row at all.
    pub fn no_information() -> Self {
        Self::from_label("")
    }
}

/// One bar of the tier-distribution chart.
#[derive(Debug, Clone, Serialize)]
pub struct TierBar {
    pub label: String,
    pub display_label: String,
    pub count: usize,
    /// The selected district's tier is flagged so the client can color it apart.
    pub highlighted: bool,
}

/// Bar chart series: district counts per tier, descending.
#[derive(Debug, Clone, Serialize)]
pub struct TierDistribution {
    pub bars: Vec<TierBar>,
}

pub fn tier_distribution(table: &DistrictTable, selected_label: Option<&str>) -> TierDistribution {
    let bars = table
        .tier_counts()
        .into_iter()
        .map(|(label, count)| {
            let display_label = match RiskTier::from_label(&label) {
                Some(tier) => tier.display_label(),
                None => label.clone(),
            };
            let highlighted = selected_label == Some(label.as_str());
            TierBar {
                label,
                display_label,
                count,
                highlighted,
            }
        })
        .collect();
    TierDistribution { bars }
}
