// Domain layer - Datasets, derived views and the dashboard page model
pub mod artifact;
pub mod chart;
pub mod clusters;
pub mod dashboard;
pub mod dataset;
pub mod hypothesis;
pub mod trend;
