use crate::services::metrics::get_metrics;
use axum::response::IntoResponse;

pub async fn metrics() -> impl IntoResponse {
    get_metrics()
}
