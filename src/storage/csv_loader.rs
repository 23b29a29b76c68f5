use crate::error::{EtlError, EtlResult};
use crate::models::columns::{ITEM_MRP, ITEM_OUTLET_SALES, ITEM_VISIBILITY, OUTLET_ESTABLISHMENT_YEAR};
use crate::models::{input_columns, input_schema};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// How values that do not parse as their column's dtype are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Any unparseable value aborts the run.
    #[default]
    Strict,
    /// Unparseable values become null and are reported as a warning.
    Lenient,
}

/// Columns that are never legitimately null in a well-formed extract.
const REQUIRED_NUMERIC: [&str; 4] = [
    ITEM_VISIBILITY,
    ITEM_MRP,
    OUTLET_ESTABLISHMENT_YEAR,
    ITEM_OUTLET_SALES,
];

pub struct CsvLoader {
    mode: LoadMode,
}

impl CsvLoader {
    pub fn new(mode: LoadMode) -> Self {
        Self { mode }
    }

    pub fn load_path(&self, path: &Path) -> EtlResult<DataFrame> {
        let bytes = std::fs::read(path)?;
        info!("Read {} bytes from {}", bytes.len(), path.display());
        self.load_bytes(bytes)
    }

    pub fn load_bytes(&self, bytes: Vec<u8>) -> EtlResult<DataFrame> {
        check_header(&bytes)?;

        let lenient = self.mode == LoadMode::Lenient;
        let result = CsvReadOptions::default()
            .with_has_header(true)
            .with_schema_overwrite(Some(Arc::new(input_schema())))
            .with_ignore_errors(lenient)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish();

        let df = match result {
            Ok(df) => df,
            Err(e) if lenient => return Err(e.into()),
            Err(e) => return Err(EtlError::Load(e)),
        };

        if lenient {
            report_nulls(&df)?;
        }

        info!("Loaded {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }
}

/// Fails on a missing column before any value is parsed.
fn check_header(bytes: &[u8]) -> EtlResult<()> {
    let header = header_columns(bytes).ok_or(EtlError::EmptyInput)?;

    let missing: Vec<String> = input_columns()
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !header.iter().any(|h| h == name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EtlError::MissingColumns { columns: missing })
    }
}

fn header_columns(bytes: &[u8]) -> Option<Vec<String>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let line_end = bytes.iter().position(|b| *b == b'\n').unwrap_or(bytes.len());
    let line = String::from_utf8_lossy(&bytes[..line_end]);
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    Some(
        line.split(',')
            .map(|field| field.trim().trim_matches('"').to_string())
            .collect(),
    )
}

fn report_nulls(df: &DataFrame) -> EtlResult<()> {
    for name in REQUIRED_NUMERIC {
        let nulls = df.column(name)?.null_count();
        if nulls > 0 {
            warn!(
                "⚠️ {} value(s) in {} are missing or failed to parse and were loaded as null",
                nulls, name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{f64_values, record, to_csv};

    fn sample_csv() -> String {
        to_csv(&[
            record("Dairy", "OUT10", 100.0, 250.5),
            record("Meat", "OUT11", 45.0, 80.0),
        ])
    }

    #[test]
    fn test_loads_typed_columns() {
        let df = CsvLoader::new(LoadMode::Strict)
            .load_bytes(sample_csv().into_bytes())
            .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column(ITEM_MRP).unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            df.column(OUTLET_ESTABLISHMENT_YEAR).unwrap().dtype(),
            &DataType::Int64
        );
        assert_eq!(f64_values(&df, ITEM_OUTLET_SALES), vec![Some(250.5), Some(80.0)]);
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let csv = sample_csv().replace("Item_MRP", "Item_Price");

        let err = CsvLoader::new(LoadMode::Strict)
            .load_bytes(csv.into_bytes())
            .unwrap_err();
        match err {
            EtlError::MissingColumns { columns } => assert_eq!(columns, vec!["Item_MRP"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = CsvLoader::new(LoadMode::Strict)
            .load_bytes(Vec::new())
            .unwrap_err();
        assert!(matches!(err, EtlError::EmptyInput));
    }

    #[test]
    fn test_strict_mode_rejects_non_numeric_values() {
        let csv = sample_csv().replace("250.5", "n/a");

        let err = CsvLoader::new(LoadMode::Strict)
            .load_bytes(csv.into_bytes())
            .unwrap_err();
        assert!(matches!(err, EtlError::Load(_)));
    }

    #[test]
    fn test_lenient_mode_loads_bad_values_as_null() {
        let csv = sample_csv().replace("250.5", "n/a");

        let df = CsvLoader::new(LoadMode::Lenient)
            .load_bytes(csv.into_bytes())
            .unwrap();
        assert_eq!(f64_values(&df, ITEM_OUTLET_SALES), vec![None, Some(80.0)]);
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retail_data_t1.csv");
        std::fs::write(&path, sample_csv()).unwrap();

        let df = CsvLoader::new(LoadMode::default()).load_path(&path).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_header_parsing_ignores_quotes_and_bom() {
        let header = header_columns(b"\xEF\xBB\xBF\"A\", B\r\n1,2\n").unwrap();
        assert_eq!(header, vec!["A", "B"]);
    }
}
