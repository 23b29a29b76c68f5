use crate::error::{EtlError, EtlResult};
use crate::models::columns::{ITEM_TYPE, OUTLET_IDENTIFIER, OUTLET_TYPE, PRICE_BAND, TOTAL_SALES};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const RUN_REPORT_FILE: &str = "_run_report.json";
pub const PART_FILE: &str = "part-00000.parquet";
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

#[derive(Debug, Clone)]
pub struct WriteSummary {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub rows: usize,
}

/// Persists the final table as Parquet, replacing any previous output of the
/// same run only once every file has been written.
pub struct OutputWriter {
    partition_by_outlet_type: bool,
}

impl OutputWriter {
    pub fn new(partition_by_outlet_type: bool) -> Self {
        Self {
            partition_by_outlet_type,
        }
    }

    /// Final ordering: revenue descending, then the grouping keys ascending so
    /// equal totals still come out in a fixed order.
    pub fn order(df: &DataFrame) -> EtlResult<DataFrame> {
        let ordered = df
            .clone()
            .lazy()
            .sort_by_exprs(
                [
                    col(TOTAL_SALES),
                    col(OUTLET_IDENTIFIER),
                    col(ITEM_TYPE),
                    col(PRICE_BAND),
                    col(OUTLET_TYPE),
                ],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false, false, false, false])
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        Ok(ordered)
    }

    pub fn write<R: Serialize>(
        &self,
        df: &DataFrame,
        target: &Path,
        report: &R,
    ) -> EtlResult<WriteSummary> {
        let staging = staging_dir(target)?;
        fs::create_dir_all(&staging)?;

        match self.write_into(df, &staging, report) {
            Ok(files) => {
                let files = publish(&staging, target, files)?;
                info!("Wrote {} rows in {} file(s) to {}", df.height(), files.len(), target.display());
                Ok(WriteSummary {
                    output_dir: target.to_path_buf(),
                    files,
                    rows: df.height(),
                })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&staging) {
                    warn!("Failed to remove staging dir {}: {}", staging.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    fn write_into<R: Serialize>(
        &self,
        df: &DataFrame,
        dir: &Path,
        report: &R,
    ) -> EtlResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        if self.partition_by_outlet_type {
            let outlet_types: BTreeSet<Option<String>> = df
                .column(OUTLET_TYPE)?
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_owned))
                .collect();

            for outlet_type in outlet_types {
                let predicate = match &outlet_type {
                    Some(value) => col(OUTLET_TYPE).eq(lit(value.as_str())),
                    None => col(OUTLET_TYPE).is_null(),
                };
                let part = df.clone().lazy().filter(predicate).collect()?;

                let partition_dir = dir.join(format!(
                    "{}={}",
                    OUTLET_TYPE,
                    outlet_type
                        .as_deref()
                        .map(escape_partition_value)
                        .unwrap_or_else(|| DEFAULT_PARTITION.to_string())
                ));
                fs::create_dir_all(&partition_dir)?;
                files.push(write_parquet(&part, &partition_dir.join(PART_FILE))?);
            }
        } else {
            files.push(write_parquet(df, &dir.join(PART_FILE))?);
        }

        let report_path = dir.join(RUN_REPORT_FILE);
        fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
        files.push(report_path);

        Ok(files)
    }
}

fn write_parquet(df: &DataFrame, path: &Path) -> EtlResult<PathBuf> {
    let mut file = File::create(path)?;
    let mut df = df.clone();
    ParquetWriter::new(&mut file).finish(&mut df)?;
    Ok(path.to_path_buf())
}

fn staging_dir(target: &Path) -> EtlResult<PathBuf> {
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| EtlError::Config(format!("output path has no name: {}", target.display())))?;
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!(".{}.staging-{}", name, Uuid::new_v4())))
}

/// Swaps the staging directory into place and rewrites the file list to its
/// final location.
fn publish(staging: &Path, target: &Path, files: Vec<PathBuf>) -> EtlResult<Vec<PathBuf>> {
    if target.is_dir() {
        fs::remove_dir_all(target)?;
    } else if target.exists() {
        fs::remove_file(target)?;
    }
    fs::rename(staging, target)?;

    Ok(files
        .into_iter()
        .map(|f| match f.strip_prefix(staging) {
            Ok(relative) => target.join(relative),
            Err(_) => f,
        })
        .collect())
}

fn escape_partition_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '/' | '\\' | ':' | '=' | '%' | '"' | '#' | '?' | '*') || c.is_control() {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}
