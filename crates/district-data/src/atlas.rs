//! Joined atlas: dataset left-joined with boundaries by administrative name.

use crate::{
    boundary::BoundaryIndex, loader::load_districts, DistrictBoundary, DistrictRecord,
    DistrictTable, Result,
};
use std::path::Path;
use tracing::info;

/// The process-lifetime snapshot: risk table plus boundary index.
///
/// The join is a left join on `adm_name`: a district without geometry stays
/// in the table and simply has nothing to render on the map.
#[derive(Debug, Clone)]
pub struct DistrictAtlas {
    pub table: DistrictTable,
    pub boundaries: BoundaryIndex,
}

impl DistrictAtlas {
    pub fn new(table: DistrictTable, boundaries: BoundaryIndex) -> Self {
        let with_geometry = table
            .records()
            .iter()
            .filter(|r| boundaries.get(&r.adm_name).is_some())
            .count();
        info!(
            "Atlas joined: {}/{} districts have boundary geometry",
            with_geometry,
            table.len()
        );
        Self { table, boundaries }
    }

    /// Load both files and join them.
    pub fn load(data_path: impl AsRef<Path>, boundary_path: impl AsRef<Path>) -> Result<Self> {
        let table = load_districts(data_path)?;
        let boundaries = BoundaryIndex::load(boundary_path)?;
        Ok(Self::new(table, boundaries))
    }

    pub fn get(&self, name: &str) -> Option<&DistrictRecord> {
        self.table.get(name)
    }

    /// Boundary for a record; `None` when the join missed.
    pub fn boundary_for(&self, record: &DistrictRecord) -> Option<&DistrictBoundary> {
        self.boundaries.get(&record.adm_name)
    }
}
