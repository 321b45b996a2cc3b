use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "config/pipeline";
const ENV_PREFIX: &str = "TRIPS";

/// Where the pipeline reads from and writes to
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub reject_log: PathBuf,
}

pub fn load_pipeline_config() -> anyhow::Result<PipelineConfig> {
    load_pipeline_config_from(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
}

/// Defaults, overridden by `file`, overridden by `TRIPS_*` environment variables
pub fn load_pipeline_config_from<F>(file: F) -> anyhow::Result<PipelineConfig>
where
    F: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("input_path", "points.csv")?
        .set_default("output_dir", ".")?
        .set_default("reject_log", "rejects.log")?
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize()?)
}
