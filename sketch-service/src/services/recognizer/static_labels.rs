//! Fixed-answer recognizer for development and testing.

use super::{Recognizer, RecognizerError};
use async_trait::async_trait;
use image::DynamicImage;

/// Returns the same labels for every drawing.
pub struct StaticRecognizer {
    labels: Vec<String>,
}

impl StaticRecognizer {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl Recognizer for StaticRecognizer {
    async fn predict(&self, image: &DynamicImage) -> Result<Vec<String>, RecognizerError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RecognizerError::InvalidImage(
                "Image has no pixels".to_string(),
            ));
        }

        Ok(self.labels.clone())
    }

    async fn health_check(&self) -> Result<(), RecognizerError> {
        Ok(())
    }
}
