use crate::error::EtlResult;
use crate::models::columns::{ITEM_FAT_CONTENT, ITEM_TYPE, ITEM_VISIBILITY};
use crate::processor::partition::{broadcast, partition_aggregate};
use polars::prelude::*;

pub const LOW_FAT: &str = "Low Fat";
pub const REGULAR: &str = "Regular";

/// Normalizes the noisy fat-content categorical and replaces zero-visibility
/// sentinels. Row count and column set are unchanged.
pub struct Cleaner;

impl Cleaner {
    pub fn clean(&self, df: &DataFrame) -> EtlResult<DataFrame> {
        let fat_content = self.normalize_fat_content(df)?;
        let visibility = self.impute_visibility(df)?;

        let mut cleaned = df.clone();
        cleaned.with_column(fat_content)?;
        cleaned.with_column(visibility)?;

        Ok(cleaned)
    }

    /// Unknown spellings and nulls pass through untouched.
    fn normalize_fat_content(&self, df: &DataFrame) -> EtlResult<Series> {
        let normalized: Vec<Option<String>> = df
            .column(ITEM_FAT_CONTENT)?
            .str()?
            .into_iter()
            .map(|value| value.map(|v| canonical_fat_content(v).unwrap_or(v).to_string()))
            .collect();

        Ok(Series::new(ITEM_FAT_CONTENT.into(), normalized))
    }

    /// Zeros take the mean visibility of their item type. The mean is taken
    /// before substitution, so the zeros themselves pull it down.
    fn impute_visibility(&self, df: &DataFrame) -> EtlResult<Series> {
        let type_means = partition_aggregate(df, ITEM_TYPE, col(ITEM_VISIBILITY).mean())?;
        let per_row_mean = broadcast(df, ITEM_TYPE, &type_means)?;

        let imputed: Vec<Option<f64>> = df
            .column(ITEM_VISIBILITY)?
            .f64()?
            .into_iter()
            .zip(per_row_mean)
            .map(|(visibility, mean)| match visibility {
                Some(v) if v == 0.0 => mean.or(Some(v)),
                other => other,
            })
            .collect();

        Ok(Series::new(ITEM_VISIBILITY.into(), imputed))
    }
}

pub fn canonical_fat_content(raw: &str) -> Option<&'static str> {
    match raw.to_lowercase().as_str() {
        "lf" | "low fat" => Some(LOW_FAT),
        "reg" | "regular" => Some(REGULAR),
        _ => None,
    }
}
