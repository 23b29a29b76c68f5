use crate::error::EtlResult;
use crate::models::PriceBand;
use crate::models::columns::{ITEM_MRP, OUTLET_AGE, OUTLET_ESTABLISHMENT_YEAR, PRICE_BAND};
use polars::prelude::*;

/// Row-wise derivations. The current year is injected so runs are
/// reproducible; nothing here reads the clock.
pub struct FeatureEnricher {
    current_year: i32,
}

impl FeatureEnricher {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn enrich(&self, df: &DataFrame) -> EtlResult<DataFrame> {
        let price_bands: Vec<&str> = df
            .column(ITEM_MRP)?
            .f64()?
            .into_iter()
            .map(|mrp| PriceBand::from_optional_mrp(mrp).as_str())
            .collect();

        // Negative ages are kept; the business filter owns that rule.
        let mut enriched = df
            .clone()
            .lazy()
            .with_column(
                (lit(i64::from(self.current_year)) - col(OUTLET_ESTABLISHMENT_YEAR)).alias(OUTLET_AGE),
            )
            .collect()?;
        enriched.with_column(Series::new(PRICE_BAND.into(), price_bands))?;

        Ok(enriched)
    }
}
