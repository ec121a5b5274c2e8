// Application layer - Use cases over artifact repositories
pub mod artifact_bundle;
pub mod artifact_repository;
pub mod dashboard_service;
