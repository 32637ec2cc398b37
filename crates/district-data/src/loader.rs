//! Tabular dataset loading

use crate::{DataError, DistrictRecord, DistrictTable, Result};
use std::path::Path;
use tracing::info;

/// Load the risk dataset from a CSV file with the Korean column headers.
///
/// Rows with non-finite numeric values are skipped rather than rejected; an
/// empty resulting table is an error because nothing downstream can serve
/// without districts.
pub fn load_districts(path: impl AsRef<Path>) -> Result<DistrictTable> {
    let path = path.as_ref();
    info!("Loading district dataset from {:?}", path);

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    let mut skipped = 0;

    for row in reader.deserialize() {
        let record: DistrictRecord = row?;
        if !record.combined_score.is_finite()
            || !record.feature_vector().iter().all(|v| v.is_finite())
        {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataError::EmptyDataset(path.display().to_string()));
    }

    let table = DistrictTable::new(records);
    info!(
        "Loaded {} districts ({} skipped for non-finite values)",
        table.len(),
        skipped
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "동,행정동,클러스터,상권활성화지수,상권활성화_SNS,젠트리피케이션지수,젠트리피케이션_SNS,합산지수";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_load_districts() {
        let file = write_csv(&[
            "성수동,서울특별시 성동구 성수1가1동,주의,10.0,1.0,5.0,2.0,4.5",
            "연남동,서울특별시 마포구 연남동,위험_관심집중형,55.2,40.1,60.3,48.8,51.1",
        ]);

        let table = load_districts(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        let seongsu = table.get("성수동").unwrap();
        assert_eq!(seongsu.tier_label, "주의");
        assert_eq!(seongsu.adm_name, "서울특별시 성동구 성수1가1동");
        assert!((seongsu.combined_score - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_rows_skipped() {
        let file = write_csv(&[
            "성수동,서울특별시 성동구 성수1가1동,주의,10.0,1.0,5.0,2.0,4.5",
            "명동,서울특별시 중구 명동,경계,NaN,1.0,5.0,2.0,4.5",
        ]);

        let table = load_districts(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("명동").is_none());
    }

    #[test]
    fn test_empty_dataset_is_error() {
        let file = write_csv(&[]);
        let err = load_districts(file.path()).unwrap_err();
        assert!(matches!(err, DataError::EmptyDataset(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_districts("/nonexistent/districts.csv").unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn test_unknown_tier_label_is_not_an_error() {
        let file = write_csv(&["성수동,서울특별시 성동구 성수1가1동,미분류,1.0,1.0,1.0,1.0,1.0"]);
        let table = load_districts(file.path()).unwrap();
        assert_eq!(table.get("성수동").unwrap().tier_label, "미분류");
    }
}
