use crate::error::{EtlError, EtlResult};
use crate::storage::{LoadMode, RUN_TAG_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfigFile {
    pub paths: PathsSection,
    #[serde(default)]
    pub run: RunSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsSection {
    pub base_dir: String,
    pub input_template: Option<String>,
    pub output_template: Option<String>,
    // Name of the variable that overrides base_dir
    pub env_base_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSection {
    pub current_year: Option<i32>,
    pub load_mode: Option<LoadMode>,
    pub partition_by_outlet_type: Option<bool>,
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_dir: String,
    pub input_template: String,
    pub output_template: String,
    pub env_base_dir: Option<String>,
    pub current_year: Option<i32>,
    pub load_mode: LoadMode,
    pub partition_by_outlet_type: bool,
    pub preview_rows: usize,
}

impl PipelineConfig {
    pub const DEFAULT_INPUT_TEMPLATE: &'static str = "raw/retail_data_{tts}.csv";
    pub const DEFAULT_OUTPUT_TEMPLATE: &'static str = "processed/good_data_{tts}";
    pub const DEFAULT_ENV_BASE_DIR: &'static str = "RETAIL_ETL_BASE_DIR";

    pub fn from_file(path: &str) -> EtlResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EtlError::Config(format!("failed to read {}: {}", path, e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> EtlResult<Self> {
        let config_file: PipelineConfigFile = toml::from_str(content)
            .map_err(|e| EtlError::Config(format!("failed to parse pipeline config: {}", e)))?;

        let mut config = Self::from_sections(config_file.paths, config_file.run);
        config.load_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_sections(paths: PathsSection, run: RunSection) -> Self {
        Self {
            base_dir: paths.base_dir,
            input_template: paths
                .input_template
                .unwrap_or_else(|| Self::DEFAULT_INPUT_TEMPLATE.to_string()),
            output_template: paths
                .output_template
                .unwrap_or_else(|| Self::DEFAULT_OUTPUT_TEMPLATE.to_string()),
            env_base_dir: paths.env_base_dir,
            current_year: run.current_year,
            load_mode: run.load_mode.unwrap_or_default(),
            partition_by_outlet_type: run.partition_by_outlet_type.unwrap_or(false),
            preview_rows: run.preview_rows.unwrap_or(10),
        }
    }

    /// Applies the base-dir override from the environment, if set.
    pub fn load_env_overrides(&mut self) {
        let var = self
            .env_base_dir
            .as_deref()
            .unwrap_or(Self::DEFAULT_ENV_BASE_DIR);

        if let Ok(base_dir) = env::var(var) {
            if !base_dir.trim().is_empty() {
                self.base_dir = base_dir;
            }
        }
    }

    pub fn validate(&self) -> EtlResult<()> {
        if self.base_dir.trim().is_empty() {
            return Err(EtlError::Config("base_dir cannot be empty".to_string()));
        }

        for (name, template) in [
            ("input_template", &self.input_template),
            ("output_template", &self.output_template),
        ] {
            if !template.contains(RUN_TAG_PLACEHOLDER) {
                return Err(EtlError::Config(format!(
                    "{} must contain the {} placeholder",
                    name, RUN_TAG_PLACEHOLDER
                )));
            }
        }

        if self.input_template == self.output_template {
            return Err(EtlError::Config(
                "input and output templates must differ".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_dir: "data/synthetic".to_string(),
            input_template: Self::DEFAULT_INPUT_TEMPLATE.to_string(),
            output_template: Self::DEFAULT_OUTPUT_TEMPLATE.to_string(),
            env_base_dir: None,
            current_year: None,
            load_mode: LoadMode::Strict,
            partition_by_outlet_type: false,
            preview_rows: 10,
        }
    }
}
