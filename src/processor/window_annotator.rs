use crate::error::EtlResult;
use crate::models::columns::{
    AVG_MRP_PER_ITEM_TYPE, ITEM_MRP, ITEM_OUTLET_SALES, ITEM_TYPE, OUTLET_IDENTIFIER,
    SALES_RANK_IN_OUTLET,
};
use crate::processor::partition::{broadcast, competition_rank_desc, partition_aggregate};
use polars::prelude::*;

/// Appends per-partition metrics without collapsing rows.
pub struct WindowAnnotator;

impl WindowAnnotator {
    pub fn annotate(&self, df: &DataFrame) -> EtlResult<DataFrame> {
        let mrp_means = partition_aggregate(df, ITEM_TYPE, col(ITEM_MRP).mean())?;
        let avg_mrp = broadcast(df, ITEM_TYPE, &mrp_means)?;
        let ranks = competition_rank_desc(df, OUTLET_IDENTIFIER, ITEM_OUTLET_SALES)?;

        let mut annotated = df.clone();
        annotated.with_column(Series::new(AVG_MRP_PER_ITEM_TYPE.into(), avg_mrp))?;
        annotated.with_column(Series::new(SALES_RANK_IN_OUTLET.into(), ranks))?;

        Ok(annotated)
    }
}
