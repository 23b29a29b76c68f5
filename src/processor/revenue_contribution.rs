use crate::error::{EtlError, EtlResult};
use crate::models::columns::{OUTLET_IDENTIFIER, REVENUE_CONTRIBUTION_PERCENT, TOTAL_SALES};
use crate::processor::partition::{broadcast, partition_aggregate};
use polars::prelude::*;

/// Share of each aggregated row in its outlet's revenue, in percent with two
/// decimals. Operates on the aggregated table, so the denominator is the sum
/// of `Total_Sales` over that outlet's summary rows.
pub struct RevenueContribution;

impl RevenueContribution {
    pub fn enrich(&self, aggregated: &DataFrame) -> EtlResult<DataFrame> {
        let outlet_totals =
            partition_aggregate(aggregated, OUTLET_IDENTIFIER, col(TOTAL_SALES).sum())?;
        let denominators = broadcast(aggregated, OUTLET_IDENTIFIER, &outlet_totals)?;

        let outlets = aggregated.column(OUTLET_IDENTIFIER)?.str()?;
        let totals = aggregated.column(TOTAL_SALES)?.f64()?;

        let mut percents = Vec::with_capacity(aggregated.height());
        for ((outlet, total), denominator) in outlets
            .into_iter()
            .zip(totals.into_iter())
            .zip(denominators)
        {
            percents.push(contribution_percent(outlet, total, denominator)?);
        }

        let mut enriched = aggregated.clone();
        enriched.with_column(Series::new(REVENUE_CONTRIBUTION_PERCENT.into(), percents))?;
        Ok(enriched)
    }
}

fn contribution_percent(
    outlet: Option<&str>,
    total: Option<f64>,
    outlet_total: Option<f64>,
) -> EtlResult<Option<f64>> {
    let Some(total) = total else {
        return Ok(None);
    };

    // Unreachable after the business filter: every outlet left in the
    // aggregated table has only positive totals.
    let outlet_total = outlet_total.unwrap_or(0.0);
    if outlet_total <= 0.0 || !outlet_total.is_finite() {
        return Err(EtlError::ZeroPartitionTotal {
            outlet: outlet.unwrap_or("<null>").to_string(),
            total: outlet_total,
        });
    }

    Ok(Some(round_to_cents(total / outlet_total * 100.0)))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
