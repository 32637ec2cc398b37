//! District Risk Dataset
//!
//! Read-only in-memory table of per-district risk records, loaded once at
//! startup from the tabular dataset, plus the GeoJSON boundary index and the
//! left join between the two. Nothing here mutates after load; the whole
//! atlas is shared by reference for the process lifetime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod atlas;
pub mod boundary;
pub mod loader;

pub use atlas::DistrictAtlas;
pub use boundary::{BoundaryIndex, DistrictBoundary};
pub use loader::load_districts;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("dataset at {0} contains no districts")]
    EmptyDataset(String),
    #[error("boundary file at {0} is not a FeatureCollection")]
    NotAFeatureCollection(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// Names of the numeric dataset columns, in dataset order. The factual
/// scorer matches generated text against these exact keys.
pub const NUMERIC_FIELDS: [&str; 5] = [
    "상권활성화지수",
    "상권활성화_SNS",
    "젠트리피케이션지수",
    "젠트리피케이션_SNS",
    "합산지수",
];

/// One row of the risk dataset. Sourced read-only; never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictRecord {
    /// Short district name (primary key, e.g. 성수동).
    #[serde(rename = "동")]
    pub name: String,
    /// Full administrative name, the boundary join key (matches `adm_nm`).
    #[serde(rename = "행정동")]
    pub adm_name: String,
    /// Raw tier label. Unmapped labels are tolerated and render as unknown.
    #[serde(rename = "클러스터")]
    pub tier_label: String,
    #[serde(rename = "상권활성화지수")]
    pub business_activation: f64,
    #[serde(rename = "상권활성화_SNS")]
    pub business_activation_sns: f64,
    #[serde(rename = "젠트리피케이션지수")]
    pub gentrification: f64,
    #[serde(rename = "젠트리피케이션_SNS")]
    pub gentrification_sns: f64,
    /// Aggregated score driving the choropleth coloring.
    #[serde(rename = "합산지수")]
    pub combined_score: f64,
}

impl DistrictRecord {
    /// Feature vector in the model's trained column order.
    pub fn feature_vector(&self) -> [f64; 4] {
        [
            self.business_activation,
            self.business_activation_sns,
            self.gentrification,
            self.gentrification_sns,
        ]
    }

    /// Numeric fields as (column name, value) pairs, dataset order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            (NUMERIC_FIELDS[0], self.business_activation),
            (NUMERIC_FIELDS[1], self.business_activation_sns),
            (NUMERIC_FIELDS[2], self.gentrification),
            (NUMERIC_FIELDS[3], self.gentrification_sns),
            (NUMERIC_FIELDS[4], self.combined_score),
        ]
    }
}

/// The loaded dataset: ordered records plus a name index.
#[derive(Debug, Clone, Default)]
pub struct DistrictTable {
    records: Vec<DistrictRecord>,
    index: HashMap<String, usize>,
}

impl DistrictTable {
    /// Build from records. Duplicate names keep the first occurrence.
    pub fn new(records: Vec<DistrictRecord>) -> Self {
        let mut table = DistrictTable::default();
        let mut duplicates = 0;
        for record in records {
            if table.index.contains_key(&record.name) {
                duplicates += 1;
                continue;
            }
            table.index.insert(record.name.clone(), table.records.len());
            table.records.push(record);
        }
        if duplicates > 0 {
            tracing::warn!("{} duplicate district rows dropped", duplicates);
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&DistrictRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// District counts per raw tier label, descending by count.
    /// Ties break by label so the ordering is stable across runs.
    pub fn tier_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.tier_label.as_str()).or_default() += 1;
        }
        let mut out: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Districts sharing the tier label of `name`, excluding `name` itself.
    pub fn peers_of(&self, name: &str) -> Vec<&DistrictRecord> {
        let Some(target) = self.get(name) else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| r.tier_label == target.tier_label && r.name != name)
            .collect()
    }

    /// Combined scores across all districts, record order.
    pub fn combined_scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.combined_score).collect()
    }
}
