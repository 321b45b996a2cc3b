// Infrastructure layer - Files, configuration and format adapters
pub mod config;
pub mod csv_source;
pub mod file_sink;
pub mod geojson_mapper;
pub mod reject_log;
