//! Gentrification Risk Tiers
//!
//! Closed seven-label taxonomy for Seoul district risk levels, plus the
//! trained-classifier inference path that maps a four-index feature vector
//! onto one of those labels.
//!
//! The label set and descriptions are fixed; districts whose dataset label
//! falls outside the set render through the "no information" sentinel rather
//! than failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod classifier;

pub use classifier::{ClassifierArtifact, LabelEncoder, Prediction, TierClassifier};

/// Marker prefix shared by the four high-risk sub-family labels.
pub const HIGH_RISK_MARKER: &str = "위험_";

/// Display sentinel for districts whose tier label is unmapped or missing.
pub const UNKNOWN_TIER_DISPLAY: &str = "❓ 정보 없음";

/// Description sentinel for an unmapped tier label.
pub const UNKNOWN_TIER_DESCRIPTION: &str = "해당 위험 단계에 대한 정보가 없습니다.";

/// Caution note appended whenever a prediction lands in the high-risk family.
pub const HIGH_RISK_CAUTION: &str =
    "⚠️ **이 지역은 다른 지역에 비해 상권 활성화와 젠트리피케이션이 상당히 진행된 상태입니다.**";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("classifier artifact contains no trees")]
    EmptyModel,
    #[error("classifier declares {declared} features but tree {tree} splits on feature {feature}")]
    FeatureOutOfRange {
        declared: usize,
        tree: usize,
        feature: usize,
    },
    #[error("tree {tree} targets class {class} but the model declares {num_classes} classes")]
    ClassOutOfRange {
        tree: usize,
        class: usize,
        num_classes: usize,
    },
    #[error("node {node} in tree {tree} is neither a split nor a leaf")]
    MalformedNode { tree: usize, node: usize },
    #[error("tree {tree} walk revisits node {node} (cycle)")]
    CyclicTree { tree: usize, node: usize },
    #[error("label encoder lists {encoder} classes but the model expects {model}")]
    ClassCountMismatch { encoder: usize, model: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Coarse ordinal severity group behind the seven tier labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Caution,
    Watch,
    Risk,
}

impl Severity {
    /// Badge glyph used by the display labels.
    pub fn badge(&self) -> &'static str {
        match self {
            Severity::Normal => "🟢",
            Severity::Caution => "🟡",
            Severity::Watch => "🟠",
            Severity::Risk => "🔴",
        }
    }
}

/// One of the seven gentrification risk tiers.
///
/// Wire representation is the Korean dataset label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "일반")]
    General,
    #[serde(rename = "주의")]
    Caution,
    #[serde(rename = "경계")]
    Watch,
    #[serde(rename = "위험_상권발달형")]
    CommercialGrowth,
    #[serde(rename = "위험_관심집중형")]
    SpotlightSurge,
    #[serde(rename = "위험_균형진행형")]
    BalancedProgression,
    #[serde(rename = "위험_젠트리피케이션과열형")]
    Overheated,
}

/// All seven tiers, ordered from lowest to highest severity.
pub const ALL_TIERS: [RiskTier; 7] = [
    RiskTier::General,
    RiskTier::Caution,
    RiskTier::Watch,
    RiskTier::CommercialGrowth,
    RiskTier::SpotlightSurge,
    RiskTier::BalancedProgression,
    RiskTier::Overheated,
];

impl RiskTier {
    /// Parse a dataset label. Unmapped labels are `None`, not an error.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "일반" => Some(RiskTier::General),
            "주의" => Some(RiskTier::Caution),
            "경계" => Some(RiskTier::Watch),
            "위험_상권발달형" => Some(RiskTier::CommercialGrowth),
            "위험_관심집중형" => Some(RiskTier::SpotlightSurge),
            "위험_균형진행형" => Some(RiskTier::BalancedProgression),
            "위험_젠트리피케이션과열형" => Some(RiskTier::Overheated),
            _ => None,
        }
    }

    /// The dataset label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::General => "일반",
            RiskTier::Caution => "주의",
            RiskTier::Watch => "경계",
            RiskTier::CommercialGrowth => "위험_상권발달형",
            RiskTier::SpotlightSurge => "위험_관심집중형",
            RiskTier::BalancedProgression => "위험_균형진행형",
            RiskTier::Overheated => "위험_젠트리피케이션과열형",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RiskTier::General => Severity::Normal,
            RiskTier::Caution => Severity::Caution,
            RiskTier::Watch => Severity::Watch,
            RiskTier::CommercialGrowth
            | RiskTier::SpotlightSurge
            | RiskTier::BalancedProgression
            | RiskTier::Overheated => Severity::Risk,
        }
    }

    /// Badge-prefixed label, e.g. `🟢 일반`.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.severity().badge(), self.label())
    }

    /// Fixed explanation text shown alongside the tier.
    pub fn description(&self) -> &'static str {
        match self {
            RiskTier::General => {
                "🟢 이 지역은 상권이 안정적이며 젠트리피케이션 영향이 적은 지역으로, 임대료 상승 등의 변화도 미미한 편입니다."
            }
            RiskTier::Caution => {
                "🟡 이 지역은 상권이 서서히 성장하는 지역이며, 일부 지역에서 젠트리피케이션 변화가 시작될 가능성이 있습니다."
            }
            RiskTier::Watch => {
                "🟠 이 지역은 상권이 빠르게 성장 중이며, 젠트리피케이션 진행 가능성이 높은 지역입니다."
            }
            RiskTier::CommercialGrowth => {
                "🔴 이 지역은 상권이 발전했지만 SNS 활동이 적고 젠트리피케이션이 상대적으로 덜 진행된 지역입니다. 대표적으로 노량진, 대치동 등이 있습니다."
            }
            RiskTier::SpotlightSurge => {
                "🔴 이 지역은 SNS에서 큰 관심을 받고 있으며, 젊은 층이 많이 방문해 젠트리피케이션이 빠르게 진행 중입니다. 대표적으로 명동, 연남동 등이 있습니다"
            }
            RiskTier::BalancedProgression => {
                "🔴 이 지역은 상권, SNS 활동, 젠트리피케이션이 균형을 이루는 지역으로 점진적 변화가 예상됩니다. 대표적으로 상암동, 독산동 등이 있습니다."
            }
            RiskTier::Overheated => {
                "🔴 이 지역은 젠트리피케이션이 과열되었으나, 상권 활성화는 상대적으로 낮은 지역입니다. 대표적으로 신도림, 아현동 등이 있습니다."
            }
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.severity() == Severity::Risk
    }
}

/// Whether a raw label (e.g. straight from the label encoder) belongs to the
/// high-risk sub-family.
pub fn label_is_high_risk(label: &str) -> bool {
    label.contains(HIGH_RISK_MARKER)
}

/// Display label for a raw dataset label, falling back to the sentinel.
pub fn display_label_for(label: &str) -> String {
    match RiskTier::from_label(label) {
        Some(tier) => tier.display_label(),
        None => UNKNOWN_TIER_DISPLAY.to_string(),
    }
}

/// Description text for a raw dataset label, falling back to the sentinel.
pub fn description_for(label: &str) -> &'static str {
    match RiskTier::from_label(label) {
        Some(tier) => tier.description(),
        None => UNKNOWN_TIER_DESCRIPTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for tier in ALL_TIERS {
            assert_eq!(RiskTier::from_label(tier.label()), Some(tier));
        }
    }

    #[test]
    fn test_unknown_label_is_none() {
        assert_eq!(RiskTier::from_label("미분류"), None);
        assert_eq!(RiskTier::from_label(""), None);
    }

    #[test]
    fn test_severity_grouping() {
        assert_eq!(RiskTier::General.severity(), Severity::Normal);
        assert_eq!(RiskTier::Caution.severity(), Severity::Caution);
        assert_eq!(RiskTier::Watch.severity(), Severity::Watch);
        for tier in [
            RiskTier::CommercialGrowth,
            RiskTier::SpotlightSurge,
            RiskTier::BalancedProgression,
            RiskTier::Overheated,
        ] {
            assert_eq!(tier.severity(), Severity::Risk);
            assert!(tier.is_high_risk());
        }
    }

    #[test]
    fn test_high_risk_marker_matches_severity() {
        for tier in ALL_TIERS {
            assert_eq!(label_is_high_risk(tier.label()), tier.is_high_risk());
        }
    }

    #[test]
    fn test_display_label_badges() {
        assert_eq!(RiskTier::General.display_label(), "🟢 일반");
        assert_eq!(RiskTier::Caution.display_label(), "🟡 주의");
        assert_eq!(RiskTier::Watch.display_label(), "🟠 경계");
        assert_eq!(
            RiskTier::Overheated.display_label(),
            "🔴 위험_젠트리피케이션과열형"
        );
    }

    #[test]
    fn test_sentinel_for_unmapped_label() {
        assert_eq!(display_label_for("미분류"), UNKNOWN_TIER_DISPLAY);
        assert_eq!(description_for("미분류"), UNKNOWN_TIER_DESCRIPTION);
    }

    #[test]
    fn test_wire_label_serde() {
        let json = serde_json::to_string(&RiskTier::SpotlightSurge).unwrap();
        assert_eq!(json, "\"위험_관심집중형\"");
        let back: RiskTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RiskTier::SpotlightSurge);
    }
}
