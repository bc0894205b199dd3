use crate::dtos::{SaveEnvelope, SaveRequest};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

#[tracing::instrument(skip(state, request))]
pub async fn save_drawing(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<SaveEnvelope>, AppError> {
    if let Err(e) = request.validate() {
        let err = AppError::from(e);
        metrics::record_save(metrics::failure_outcome(&err));
        return Err(err);
    }

    tracing::info!(payload_len = request.data_url.len(), "Saving drawing");

    let labels = state.pipeline.process(request.data_url).await?;

    Ok(Json(SaveEnvelope::saved(labels)))
}
