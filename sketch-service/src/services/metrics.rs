//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics::{counter, histogram};
use service_core::error::AppError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Call once from `main`. A second call, or a recorder already installed by
/// someone else, is logged and ignored.
pub fn init_metrics() {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::warn!("Metrics handle already initialized");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count a `/save` outcome: `saved`, `rejected` or `failed`.
pub fn record_save(outcome: &'static str) {
    counter!("sketch_saves_total", "outcome" => outcome).increment(1);
}

/// Outcome label for a failed `/save`. Client mistakes are `rejected`.
pub fn failure_outcome(err: &AppError) -> &'static str {
    match err {
        AppError::ValidationError(_) | AppError::BadRequest(_) => "rejected",
        _ => "failed",
    }
}

pub fn record_recognition(duration: Duration) {
    histogram!("sketch_recognition_duration_seconds").record(duration.as_secs_f64());
}
