//! Trained-classifier inference
//!
//! Loads the exported gradient-boosted-tree artifact and its label encoder,
//! and maps a four-index feature vector to one tier label. The artifacts are
//! opaque training output; this module only validates their shape and walks
//! the trees. Inputs are NOT validated or clamped against the training
//! distribution: out-of-range indices still classify.

use crate::{label_is_high_risk, ModelError, Result, RiskTier, HIGH_RISK_CAUTION};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Number of model input features.
pub const FEATURE_COUNT: usize = 4;

/// Trained column order of the feature vector.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "상권활성화지수",
    "상권활성화_SNS",
    "젠트리피케이션지수",
    "젠트리피케이션_SNS",
];

/// One node of a decision tree: either a split or a leaf.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub leaf: Option<f64>,
}

/// A single boosted tree contributing margin to one class.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub class_index: usize,
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk the tree for one feature vector and return the leaf margin.
    ///
    /// Node indices and acyclicity are checked at load time, so the walk
    /// itself cannot fail.
    fn margin(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if let Some(value) = node.leaf {
                return value;
            }
            let feature = node.feature.unwrap_or(0);
            let threshold = node.threshold.unwrap_or(0.0);
            idx = if features[feature] < threshold {
                node.left.unwrap_or(0)
            } else {
                node.right.unwrap_or(0)
            };
        }
    }
}

/// Serialized classifier artifact (training export).
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    pub feature_names: Vec<String>,
    pub num_classes: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

/// Serialized label encoder: class index -> tier label.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

/// A prediction: the encoded label plus the optional high-risk caution note.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub tier: Option<RiskTier>,
    pub caution: Option<&'static str>,
}

/// Loaded classifier + encoder, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct TierClassifier {
    artifact: ClassifierArtifact,
    labels: Vec<String>,
}

impl TierClassifier {
    /// Load both artifacts from disk. Any failure here is fatal to callers:
    /// no prediction path exists without the model.
    pub fn load(model_path: impl AsRef<Path>, encoder_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let encoder_path = encoder_path.as_ref();
        info!("Loading classifier artifact from {:?}", model_path);

        let artifact: ClassifierArtifact =
            serde_json::from_reader(BufReader::new(File::open(model_path)?))?;
        let encoder: LabelEncoder =
            serde_json::from_reader(BufReader::new(File::open(encoder_path)?))?;

        Self::from_artifacts(artifact, encoder)
    }

    /// Assemble from already-deserialized artifacts, validating their shape.
    pub fn from_artifacts(artifact: ClassifierArtifact, encoder: LabelEncoder) -> Result<Self> {
        if artifact.trees.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if encoder.classes.len() != artifact.num_classes {
            return Err(ModelError::ClassCountMismatch {
                encoder: encoder.classes.len(),
                model: artifact.num_classes,
            });
        }
        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.class_index >= artifact.num_classes {
                return Err(ModelError::ClassOutOfRange {
                    tree: t,
                    class: tree.class_index,
                    num_classes: artifact.num_classes,
                });
            }
            validate_tree(t, tree, artifact.feature_names.len())?;
        }

        info!(
            "Classifier ready: {} trees, {} classes, features {:?}",
            artifact.trees.len(),
            artifact.num_classes,
            artifact.feature_names
        );

        Ok(Self {
            labels: encoder.classes,
            artifact,
        })
    }

    /// Encoded label for one feature vector. Deterministic: identical input
    /// yields the identical label for the life of the loaded process.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> &str {
        let mut margins = vec![self.artifact.base_score; self.artifact.num_classes];
        for tree in &self.artifact.trees {
            margins[tree.class_index] += tree.margin(features);
        }

        // argmax with lowest-index tie-break
        let mut best = 0;
        for (i, margin) in margins.iter().enumerate().skip(1) {
            if *margin > margins[best] {
                best = i;
            }
        }
        &self.labels[best]
    }

    /// Full prediction: label, parsed tier, and the caution note appended
    /// when the label carries the high-risk marker.
    pub fn predict_tier(&self, features: &[f64; FEATURE_COUNT]) -> Prediction {
        let label = self.predict(features).to_string();
        let tier = RiskTier::from_label(&label);
        let caution = label_is_high_risk(&label).then_some(HIGH_RISK_CAUTION);
        Prediction {
            label,
            tier,
            caution,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Check node indices, split completeness, and acyclicity for one tree.
fn validate_tree(tree_idx: usize, tree: &Tree, num_features: usize) -> Result<()> {
    let n = tree.nodes.len();
    if n == 0 {
        return Err(ModelError::MalformedNode {
            tree: tree_idx,
            node: 0,
        });
    }

    for (i, node) in tree.nodes.iter().enumerate() {
        if node.leaf.is_some() {
            continue;
        }
        let (feature, left, right) = match (node.feature, node.threshold, node.left, node.right) {
            (Some(f), Some(_), Some(l), Some(r)) => (f, l, r),
            _ => {
                return Err(ModelError::MalformedNode {
                    tree: tree_idx,
                    node: i,
                })
            }
        };
        if feature >= num_features {
            return Err(ModelError::FeatureOutOfRange {
                declared: num_features,
                tree: tree_idx,
                feature,
            });
        }
        if left >= n || right >= n {
            return Err(ModelError::MalformedNode {
                tree: tree_idx,
                node: i,
            });
        }
    }

    // Every walk must terminate: reject back/self edges reachable from the root.
    let mut visited = vec![false; n];
    let mut stack = vec![0usize];
    while let Some(idx) = stack.pop() {
        if visited[idx] {
            return Err(ModelError::CyclicTree {
                tree: tree_idx,
                node: idx,
            });
        }
        visited[idx] = true;
        let node = &tree.nodes[idx];
        if node.leaf.is_none() {
            stack.push(node.left.unwrap_or(0));
            stack.push(node.right.unwrap_or(0));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn leaf(value: f64) -> TreeNode {
        TreeNode {
            feature: None,
            threshold: None,
            left: None,
            right: None,
            leaf: Some(value),
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature: Some(feature),
            threshold: Some(threshold),
            left: Some(left),
            right: Some(right),
            leaf: None,
        }
    }

    /// Two-class stub: feature 2 below 5.0 classifies as class 0.
    fn stub_classifier() -> TierClassifier {
        let artifact = ClassifierArtifact {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            num_classes: 2,
            base_score: 0.0,
            trees: vec![
                Tree {
                    class_index: 0,
                    nodes: vec![split(2, 5.0, 1, 2), leaf(1.0), leaf(-1.0)],
                },
                Tree {
                    class_index: 1,
                    nodes: vec![split(2, 5.0, 1, 2), leaf(-1.0), leaf(1.0)],
                },
            ],
        };
        let encoder = LabelEncoder {
            classes: vec!["일반".to_string(), "위험_관심집중형".to_string()],
        };
        TierClassifier::from_artifacts(artifact, encoder).unwrap()
    }

    #[test]
    fn test_predict_walks_trees() {
        let clf = stub_classifier();
        assert_eq!(clf.predict(&[0.0, 0.0, 0.0, 0.0]), "일반");
        assert_eq!(clf.predict(&[0.0, 0.0, 10.0, 0.0]), "위험_관심집중형");
    }

    #[test]
    fn test_predict_is_deterministic() {
        let clf = stub_classifier();
        let features = [3.2, -1.5, 7.7, 0.4];
        let first = clf.predict(&features).to_string();
        for _ in 0..10 {
            assert_eq!(clf.predict(&features), first);
        }
    }

    #[test]
    fn test_out_of_range_inputs_still_classify() {
        let clf = stub_classifier();
        // far outside any plausible training distribution
        let label = clf.predict(&[1e9, -1e9, 1e9, -1e9]);
        assert!(clf.labels().iter().any(|l| l == label));
    }

    #[test]
    fn test_caution_note_only_for_high_risk() {
        let clf = stub_classifier();
        let normal = clf.predict_tier(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(normal.label, "일반");
        assert!(normal.caution.is_none());

        let risky = clf.predict_tier(&[0.0, 0.0, 10.0, 0.0]);
        assert_eq!(risky.label, "위험_관심집중형");
        assert_eq!(risky.caution, Some(HIGH_RISK_CAUTION));
        assert_eq!(risky.tier, Some(RiskTier::SpotlightSurge));
    }

    #[test]
    fn test_argmax_tie_break_is_lowest_index() {
        let artifact = ClassifierArtifact {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            num_classes: 2,
            base_score: 0.0,
            trees: vec![
                Tree {
                    class_index: 0,
                    nodes: vec![leaf(0.5)],
                },
                Tree {
                    class_index: 1,
                    nodes: vec![leaf(0.5)],
                },
            ],
        };
        let encoder = LabelEncoder {
            classes: vec!["경계".to_string(), "주의".to_string()],
        };
        let clf = TierClassifier::from_artifacts(artifact, encoder).unwrap();
        assert_eq!(clf.predict(&[0.0; 4]), "경계");
    }

    #[test]
    fn test_encoder_class_count_mismatch_is_fatal() {
        let artifact = ClassifierArtifact {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            num_classes: 2,
            base_score: 0.0,
            trees: vec![Tree {
                class_index: 0,
                nodes: vec![leaf(1.0)],
            }],
        };
        let encoder = LabelEncoder {
            classes: vec!["일반".to_string()],
        };
        let err = TierClassifier::from_artifacts(artifact, encoder).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ClassCountMismatch { encoder: 1, model: 2 }
        ));
    }

    #[test]
    fn test_cyclic_tree_rejected() {
        let artifact = ClassifierArtifact {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            num_classes: 1,
            base_score: 0.0,
            trees: vec![Tree {
                class_index: 0,
                nodes: vec![split(0, 1.0, 0, 0)],
            }],
        };
        let encoder = LabelEncoder {
            classes: vec!["일반".to_string()],
        };
        let err = TierClassifier::from_artifacts(artifact, encoder).unwrap_err();
        assert!(matches!(err, ModelError::CyclicTree { .. }));
    }

    #[test]
    fn test_load_from_files() {
        let model_json = serde_json::json!({
            "feature_names": FEATURE_ORDER,
            "num_classes": 2,
            "trees": [
                {"class_index": 0, "nodes": [{"leaf": 1.0}]},
                {"class_index": 1, "nodes": [{"leaf": 0.0}]}
            ]
        });
        let encoder_json = serde_json::json!({"classes": ["일반", "주의"]});

        let mut model_file = NamedTempFile::new().unwrap();
        model_file
            .write_all(model_json.to_string().as_bytes())
            .unwrap();
        let mut encoder_file = NamedTempFile::new().unwrap();
        encoder_file
            .write_all(encoder_json.to_string().as_bytes())
            .unwrap();

        let clf = TierClassifier::load(model_file.path(), encoder_file.path()).unwrap();
        assert_eq!(clf.predict(&[0.0; 4]), "일반");
    }

    #[test]
    fn test_missing_artifact_is_error() {
        let err = TierClassifier::load("/nonexistent/model.json", "/nonexistent/encoder.json")
            .unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
