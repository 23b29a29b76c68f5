use crate::error::EtlResult;
use crate::models::columns::{ITEM_MRP, ITEM_OUTLET_SALES, OUTLET_AGE};
use polars::prelude::*;
use serde::Serialize;

/// Per-predicate drop counts. A row failing several predicates is counted
/// under each of them, so the counters can sum to more than `rows_dropped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub rows_in: u64,
    pub rows_out: u64,
    pub rows_dropped: u64,
    pub non_positive_sales: u64,
    pub non_positive_mrp: u64,
    pub negative_outlet_age: u64,
}

/// Drops rows with non-positive sales or price, or an impossible outlet age.
/// Dropped rows leave no trace in the output table.
pub struct BusinessFilter;

impl BusinessFilter {
    pub fn apply(&self, df: &DataFrame) -> EtlResult<DataFrame> {
        Ok(df.clone().lazy().filter(keep_row()).collect()?)
    }

    /// Same result as [`BusinessFilter::apply`] plus the counts behind it.
    pub fn apply_with_stats(&self, df: &DataFrame) -> EtlResult<(DataFrame, FilterStats)> {
        let counts = df
            .clone()
            .lazy()
            .select([
                failing(positive_sales(), "sales"),
                failing(positive_mrp(), "mrp"),
                failing(non_negative_age(), "age"),
            ])
            .collect()?;

        let filtered = self.apply(df)?;
        let rows_in = df.height() as u64;
        let rows_out = filtered.height() as u64;
        let stats = FilterStats {
            rows_in,
            rows_out,
            rows_dropped: rows_in - rows_out,
            non_positive_sales: first_count(&counts, "sales")?,
            non_positive_mrp: first_count(&counts, "mrp")?,
            negative_outlet_age: first_count(&counts, "age")?,
        };

        Ok((filtered, stats))
    }
}

fn positive_sales() -> Expr {
    col(ITEM_OUTLET_SALES).gt(lit(0.0))
}

fn positive_mrp() -> Expr {
    col(ITEM_MRP).gt(lit(0.0))
}

fn non_negative_age() -> Expr {
    col(OUTLET_AGE).gt_eq(lit(0))
}

fn keep_row() -> Expr {
    positive_sales().and(positive_mrp()).and(non_negative_age())
}

// Null comparisons count as failures, matching what `filter` drops.
fn failing(predicate: Expr, name: &str) -> Expr {
    predicate
        .fill_null(lit(false))
        .not()
        .cast(DataType::UInt64)
        .sum()
        .alias(name)
}

fn first_count(counts: &DataFrame, name: &str) -> EtlResult<u64> {
    Ok(counts.column(name)?.u64()?.get(0).unwrap_or(0))
}
