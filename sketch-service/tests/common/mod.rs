#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use service_core::config::Config as CoreConfig;
use sketch_service::config::{
    ArtifactConfig, ObservabilityConfig, RecognizerConfig, RequestConfig, SketchConfig,
};
use sketch_service::services::SketchPipeline;
use sketch_service::startup::Application;
use std::io::Cursor;
use std::path::PathBuf;
use uuid::Uuid;

pub const TEST_LABELS: [&str; 2] = ["circle", "square"];

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
    pub artifact_path: PathBuf,
    pub client: reqwest::Client,
}

pub fn test_config() -> (SketchConfig, PathBuf) {
    let artifact_dir = PathBuf::from(format!("target/test-artifacts-{}", Uuid::new_v4()));

    let config = SketchConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port for testing
        },
        artifact: ArtifactConfig {
            path: artifact_dir.join("image.png"),
        },
        recognizer: RecognizerConfig {
            static_labels: TEST_LABELS.iter().map(|s| s.to_string()).collect(),
            ..RecognizerConfig::default()
        },
        request: RequestConfig::default(),
        observability: ObservabilityConfig {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
    };

    (config, artifact_dir)
}

impl TestApp {
    pub async fn spawn() -> Self {
        let (config, artifact_dir) = test_config();
        let artifact_path = config.artifact.path.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            artifact_dir,
            artifact_path,
            client,
        }
    }

    pub async fn get_options(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/options", self.address))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_save(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/save", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Cleanup test resources.
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.artifact_dir).await;
    }
}

/// Encode a drawing the way a browser canvas export would.
pub fn png_data_url(image: RgbaImage) -> String {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(buffer.into_inner())
    )
}

pub fn pipeline_for(config: &SketchConfig) -> SketchPipeline {
    use sketch_service::models::GridOptions;
    use sketch_service::services::{recognizer::StaticRecognizer, GridArtifactStore};
    use std::sync::Arc;

    SketchPipeline::new(
        GridOptions::default(),
        GridArtifactStore::new(config.artifact.path.clone()),
        Arc::new(StaticRecognizer::new(config.recognizer.static_labels.clone())),
    )
}
