//! The `/save` flow: decode, downsample, persist the grid, recognize.

use crate::models::GridOptions;
use crate::services::data_url;
use crate::services::downsampler::{self, DownsampleError};
use crate::services::metrics;
use crate::services::recognizer::Recognizer;
use crate::services::storage::GridArtifactStore;
use image::DynamicImage;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct SketchPipeline {
    options: GridOptions,
    store: GridArtifactStore,
    recognizer: Arc<dyn Recognizer>,
}

impl SketchPipeline {
    pub fn new(
        options: GridOptions,
        store: GridArtifactStore,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            options,
            store,
            recognizer,
        }
    }

    pub fn options(&self) -> GridOptions {
        self.options
    }

    pub fn recognizer(&self) -> &Arc<dyn Recognizer> {
        &self.recognizer
    }

    /// Run one drawing through the pipeline and return the recognizer's labels.
    ///
    /// The grid image is written before recognition. The recognizer sees the
    /// decoded drawing at full resolution, not the grid.
    pub async fn process(&self, data_url: String) -> Result<Vec<String>, AppError> {
        let result = self.run(data_url).await;
        metrics::record_save(match &result {
            Ok(_) => "saved",
            Err(e) => metrics::failure_outcome(e),
        });
        result
    }

    async fn run(&self, data_url: String) -> Result<Vec<String>, AppError> {
        let cell = self.options.pixels_per_cell;

        let (source, png) = tokio::task::spawn_blocking(move || prepare(&data_url, cell))
            .await
            .map_err(|e| AppError::InternalError(e.into()))??;

        self.store.write(&png).await?;

        let started = Instant::now();
        let labels = self.recognizer.predict(&source).await.map_err(|e| {
            tracing::error!(error = %e, "Recognizer failed");
            AppError::BadGateway(e.to_string())
        })?;
        metrics::record_recognition(started.elapsed());

        tracing::info!(
            width = source.width(),
            height = source.height(),
            labels = ?labels,
            "Drawing recognized"
        );

        Ok(labels)
    }
}

/// Decode the drawing and render its grid PNG. CPU-bound.
fn prepare(data_url: &str, cell: u32) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let source =
        data_url::decode_image(data_url).map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?;

    let grid = downsampler::downsample(&source.to_rgba8(), cell).map_err(|e| match e {
        DownsampleError::EmptyGrid { .. } => AppError::BadRequest(anyhow::Error::new(e)),
        other => AppError::InternalError(anyhow::Error::new(other)),
    })?;

    tracing::debug!(
        grid_width = grid.width(),
        grid_height = grid.height(),
        "Drawing downsampled"
    );

    let png = grid
        .encode_png()
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    Ok((source, png))
}
