//! Recognizer backed by a remote model server.
//!
//! The drawing is sent as a base64 PNG in `{"image": ...}` and the server
//! answers `{"labels": [...]}`.

use super::{Recognizer, RecognizerError};
use crate::config::RecognizerConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct PredictRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    labels: Vec<String>,
}

pub struct HttpRecognizer {
    client: Client,
    predict_url: Url,
    health_url: Url,
}

impl HttpRecognizer {
    pub fn new(
        predict_url: Url,
        health_url: Url,
        timeout: Duration,
    ) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecognizerError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            predict_url,
            health_url,
        })
    }

    /// Without an explicit health URL, `/health` on the predict URL's host is checked.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, RecognizerError> {
        let raw = config.url.as_deref().ok_or_else(|| {
            RecognizerError::NotConfigured("SKETCH_RECOGNIZER_URL is not set".to_string())
        })?;
        let predict_url = parse_url(raw)?;

        let health_url = match config.health_url.as_deref() {
            Some(url) => parse_url(url)?,
            None => predict_url
                .join("/health")
                .map_err(|e| RecognizerError::NotConfigured(format!("{}: {}", raw, e)))?,
        };

        Self::new(
            predict_url,
            health_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }
}

fn parse_url(raw: &str) -> Result<Url, RecognizerError> {
    Url::parse(raw).map_err(|e| RecognizerError::NotConfigured(format!("{}: {}", raw, e)))
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, RecognizerError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| RecognizerError::InvalidImage(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn predict(&self, image: &DynamicImage) -> Result<Vec<String>, RecognizerError> {
        let request = PredictRequest {
            image: general_purpose::STANDARD.encode(encode_png(image)?),
        };

        tracing::debug!(
            url = %self.predict_url,
            width = image.width(),
            height = image.height(),
            "Sending drawing to recognizer"
        );

        let response = self
            .client
            .post(self.predict_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognizerError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognizerError::ModelError(format!(
                "Recognizer returned {}: {}",
                status, error_text
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| RecognizerError::ModelError(format!("Failed to parse response: {}", e)))?;

        Ok(body.labels)
    }

    async fn health_check(&self) -> Result<(), RecognizerError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| RecognizerError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RecognizerError::ModelError(format!(
                "Health check returned {}",
                response.status()
            )))
        }
    }
}
