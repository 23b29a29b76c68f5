use crate::config::PipelineConfig;
use crate::error::{EtlError, EtlResult};
use regex::Regex;
use std::path::PathBuf;

pub const RUN_TAG_PLACEHOLDER: &str = "{tts}";

/// Input file and output directory of one tagged run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    pub fn resolve(config: &PipelineConfig, run_tag: &str) -> EtlResult<Self> {
        validate_run_tag(run_tag)?;

        let base = PathBuf::from(&config.base_dir);
        Ok(Self {
            input: base.join(config.input_template.replace(RUN_TAG_PLACEHOLDER, run_tag)),
            output: base.join(config.output_template.replace(RUN_TAG_PLACEHOLDER, run_tag)),
        })
    }
}

/// Tags end up in file names, so they may not contain separators or `..`.
pub fn validate_run_tag(run_tag: &str) -> EtlResult<()> {
    let pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$")?;
    if pattern.is_match(run_tag) && !run_tag.contains("..") {
        Ok(())
    } else {
        Err(EtlError::InvalidRunTag(run_tag.to_string()))
    }
}
