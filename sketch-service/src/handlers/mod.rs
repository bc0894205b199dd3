//! HTTP handlers for the sketch service.

pub mod health;
pub mod metrics;
pub mod options;
pub mod save;

pub use health::{health_check, readiness_check};
pub use options::get_options;
pub use save::save_drawing;
