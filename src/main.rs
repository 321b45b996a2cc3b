// Main entry point - Configuration and wiring of the trip pipeline
mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;

use crate::application::pipeline_service::PipelineService;
use crate::infrastructure::config::load_pipeline_config;
use crate::infrastructure::csv_source::CsvPointSource;
use crate::infrastructure::file_sink::FileTripSink;
use crate::infrastructure::reject_log::FileRejectLog;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_pipeline_config()?;

    // Create adapters (infrastructure layer)
    let source = Arc::new(CsvPointSource::new(config.input_path));
    let rejects = Arc::new(FileRejectLog::new(config.reject_log));
    let sink = Arc::new(FileTripSink::new(config.output_dir));

    tracing::info!(
        "Reading {}, writing trips to {}, rejects to {}",
        source.path().display(),
        sink.output_dir().display(),
        rejects.path().display()
    );

    // Run the pipeline (application layer)
    let service = PipelineService::new(source, rejects, sink);
    service.run()?;

    Ok(())
}
