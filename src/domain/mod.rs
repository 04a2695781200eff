// Domain layer - Document model, slot table and telemetry lookup
pub mod dashboard;
pub mod slot;
pub mod telemetry;
pub mod widget;
