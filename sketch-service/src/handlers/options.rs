use crate::models::GridOptions;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Grid parameters the drawing client sizes its canvas from.
pub async fn get_options(State(state): State<AppState>) -> Json<GridOptions> {
    Json(state.pipeline.options())
}
