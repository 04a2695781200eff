// Serial dash - Dashboard frames built from a static configuration
//
// Telemetry keys are bound to dataset positions once; each snapshot then
// patches the current values, and the document is written into a caller
// buffer as a `/*` ... `*/` frame.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::dashboard_service::Dashboard;
pub use application::document_builder::{build_document, BuildError, SlotPolicy};
pub use domain::slot::{SlotTable, ValueSlot, MAX_SLOTS};
pub use domain::telemetry::resolve_key;
pub use infrastructure::config::DashboardConfig;
pub use infrastructure::frame::{FrameError, FrameMode};
