use crate::error::EtlResult;
use crate::models::AGGREGATION_KEYS;
use crate::models::columns::{
    AVG_OUTLET_AGE, AVG_SALES, ITEM_MRP, ITEM_OUTLET_SALES, MAX_MRP, OUTLET_AGE, TOTAL_SALES,
    TRANSACTION_COUNT,
};
use polars::prelude::*;

/// Collapses filtered rows into one summary row per
/// (outlet, outlet type, item type, price band) present in the input.
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(&self, df: &DataFrame) -> EtlResult<DataFrame> {
        let aggregated = df
            .clone()
            .lazy()
            .group_by(AGGREGATION_KEYS.map(col))
            .agg([
                col(ITEM_OUTLET_SALES).sum().alias(TOTAL_SALES),
                col(ITEM_OUTLET_SALES).mean().alias(AVG_SALES),
                len().alias(TRANSACTION_COUNT),
                col(ITEM_MRP).max().alias(MAX_MRP),
                col(OUTLET_AGE).mean().alias(AVG_OUTLET_AGE),
            ])
            .collect()?;

        Ok(aggregated)
    }
}
