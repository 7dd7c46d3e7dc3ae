// Infrastructure layer - Configuration and HTTP client adapters
pub mod config;
pub mod report_client;
pub mod sample_data;
