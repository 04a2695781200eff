// Application layer - Building, updating and streaming dashboards
pub mod dashboard_service;
pub mod document_builder;
pub mod streaming_service;
