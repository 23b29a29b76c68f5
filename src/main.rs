use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use config::PipelineConfig;
use pipeline::RetailPipeline;
use storage::{CsvLoader, LoadMode, OutputWriter, RunPaths};
use tracing::info;

mod config;
mod error;
mod models;
mod pipeline;
mod processor;
mod storage;

/// Cleans, enriches and aggregates one tagged retail extract into Parquet.
#[derive(Debug, Parser)]
#[command(name = "retail-etl", version)]
struct Cli {
    /// Run tag selecting raw/retail_data_{tts}.csv and processed/good_data_{tts}
    #[arg(long, env = "RETAIL_ETL_TTS")]
    tts: String,

    #[arg(long, default_value = "src/configs/pipeline.toml")]
    config: String,

    /// Year used to compute Outlet_Age; defaults to the local calendar year
    #[arg(long)]
    current_year: Option<i32>,

    /// Load unparseable values as null instead of failing
    #[arg(long)]
    lenient: bool,

    #[arg(long)]
    partition_by_outlet_type: bool,

    #[arg(long)]
    preview_rows: Option<usize>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = PipelineConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load pipeline configuration from {}", cli.config))?;
    if cli.lenient {
        config.load_mode = LoadMode::Lenient;
    }
    if cli.partition_by_outlet_type {
        config.partition_by_outlet_type = true;
    }
    if let Some(rows) = cli.preview_rows {
        config.preview_rows = rows;
    }

    let current_year = cli
        .current_year
        .or(config.current_year)
        .unwrap_or_else(|| Local::now().year());

    let paths = RunPaths::resolve(&config, &cli.tts)?;
    info!("🚀 Starting retail ETL run '{}' (current year {})", cli.tts, current_year);
    info!("Input: {}", paths.input.display());
    info!("Output: {}", paths.output.display());

    let raw = CsvLoader::new(config.load_mode)
        .load_path(&paths.input)
        .with_context(|| format!("Failed to load {}", paths.input.display()))?;

    let output = RetailPipeline::new(current_year)
        .run(&raw)
        .context("Pipeline transformation failed")?;

    if config.preview_rows > 0 {
        info!("Top {} rows:\n{}", config.preview_rows, output.table.head(Some(config.preview_rows)));
    }

    let summary = OutputWriter::new(config.partition_by_outlet_type)
        .write(&output.table, &paths.output, &output.report)
        .with_context(|| format!("Failed to write {}", paths.output.display()))?;

    info!(
        "✅ Run '{}' complete: {} rows loaded, {} dropped by business rules, {} summary rows in {} file(s) at {}",
        cli.tts,
        output.report.rows_loaded,
        output.report.filter.rows_dropped,
        summary.rows,
        summary.files.len(),
        summary.output_dir.display()
    );

    Ok(())
}
