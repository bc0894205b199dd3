//! Shape recognizer abstraction.
//!
//! The model behind a recognizer is opaque: it takes a decoded drawing and
//! returns an ordered list of labels. Backends are chosen once at startup.

pub mod http;
pub mod static_labels;

use crate::config::{RecognizerConfig, RecognizerKind};
use async_trait::async_trait;
use image::DynamicImage;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

pub use http::HttpRecognizer;
pub use static_labels::StaticRecognizer;

/// Error type for recognizer operations.
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Recognizer not configured: {0}")]
    NotConfigured(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Classify a full-resolution drawing.
    async fn predict(&self, image: &DynamicImage) -> Result<Vec<String>, RecognizerError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), RecognizerError>;
}

/// Build the configured recognizer and confirm it is usable.
///
/// Any failure here is meant to abort startup.
pub async fn load_recognizer(config: &RecognizerConfig) -> Result<Arc<dyn Recognizer>, AppError> {
    let recognizer: Arc<dyn Recognizer> = match config.kind {
        RecognizerKind::Static => Arc::new(StaticRecognizer::new(config.static_labels.clone())),
        RecognizerKind::Http => {
            let recognizer = HttpRecognizer::from_config(config).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid recognizer configuration: {}", e))
            })?;
            Arc::new(recognizer)
        }
    };

    recognizer.health_check().await.map_err(|e| {
        tracing::error!(kind = ?config.kind, error = %e, "Recognizer failed to load");
        AppError::InternalError(anyhow::anyhow!("Failed to load recognizer: {}", e))
    })?;

    tracing::info!(kind = ?config.kind, "Recognizer loaded");
    Ok(recognizer)
}
