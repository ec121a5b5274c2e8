// Infrastructure layer - Filesystem, configuration and HTTP encoding adapters
pub mod config;
pub mod csv_dataset;
pub mod csv_repository;
pub mod html_renderer;
pub mod http_response;
