// Application layer - Use cases and the ports they depend on
pub mod pipeline_service;
pub mod trip_io;
