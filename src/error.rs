use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures a pipeline run can end with. Every variant is fatal: the run
/// aborts and no output is published.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("input is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("failed to parse input in strict mode: {0}")]
    Load(#[source] PolarsError),

    #[error("input file is empty or has no header row")]
    EmptyInput,

    #[error("invalid run tag '{0}': expected letters, digits, '.', '_' or '-'")]
    InvalidRunTag(String),

    #[error("outlet '{outlet}' has a non-positive revenue total ({total})")]
    ZeroPartitionTotal { outlet: String, total: f64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type EtlResult<T> = Result<T, EtlError>;
