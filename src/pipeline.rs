//! Orchestration of the transformation stages.
//!
//! Each stage takes the previous stage's table by reference and returns a new
//! one, so a failure anywhere leaves every earlier table intact and nothing is
//! written until the final table exists.

use crate::error::EtlResult;
use crate::models::columns::OUTLET_IDENTIFIER;
use crate::processor::{
    Aggregator, BusinessFilter, Cleaner, FeatureEnricher, FilterStats, RevenueContribution,
    WindowAnnotator,
};
use crate::storage::OutputWriter;
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Row counts of one run, persisted next to the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub current_year: i32,
    pub rows_loaded: u64,
    pub filter: FilterStats,
    pub aggregated_rows: u64,
    pub outlets: u64,
}

pub struct PipelineOutput {
    pub table: DataFrame,
    pub report: RunReport,
}

pub struct RetailPipeline {
    current_year: i32,
    cleaner: Cleaner,
    enricher: FeatureEnricher,
    annotator: WindowAnnotator,
    filter: BusinessFilter,
    aggregator: Aggregator,
    contribution: RevenueContribution,
}

impl RetailPipeline {
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            cleaner: Cleaner,
            enricher: FeatureEnricher::new(current_year),
            annotator: WindowAnnotator,
            filter: BusinessFilter,
            aggregator: Aggregator,
            contribution: RevenueContribution,
        }
    }

    /// Row-level stages up to and including the window annotations.
    pub fn annotate(&self, raw: &DataFrame) -> EtlResult<DataFrame> {
        let cleaned = self.cleaner.clean(raw)?;
        debug!("Cleaned {} rows", cleaned.height());

        let enriched = self.enricher.enrich(&cleaned)?;
        debug!("Derived Outlet_Age and Price_Band (current year {})", self.current_year);

        let annotated = self.annotator.annotate(&enriched)?;
        debug!("Annotated {} rows with partition metrics", annotated.height());

        Ok(annotated)
    }

    pub fn run(&self, raw: &DataFrame) -> EtlResult<PipelineOutput> {
        let annotated = self.annotate(raw)?;

        let (filtered, filter_stats) = self.filter.apply_with_stats(&annotated)?;
        info!(
            "Business rules kept {} of {} rows (sales<=0: {}, mrp<=0: {}, age<0: {})",
            filter_stats.rows_out,
            filter_stats.rows_in,
            filter_stats.non_positive_sales,
            filter_stats.non_positive_mrp,
            filter_stats.negative_outlet_age
        );

        let aggregated = self.aggregator.aggregate(&filtered)?;
        let enriched = self.contribution.enrich(&aggregated)?;
        let table = OutputWriter::order(&enriched)?;

        let outlets = table.column(OUTLET_IDENTIFIER)?.n_unique()? as u64;
        info!("Aggregated into {} groups across {} outlets", table.height(), outlets);

        Ok(PipelineOutput {
            report: RunReport {
                current_year: self.current_year,
                rows_loaded: raw.height() as u64,
                filter: filter_stats,
                aggregated_rows: table.height() as u64,
                outlets,
            },
            table,
        })
    }
}
