use serde::{Deserialize, Serialize};
use validator::Validate;

pub const SAVED_MESSAGE: &str = "Image saved";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveRequest {
    /// Canvas export, `data:<mime>;base64,<payload>`.
    #[serde(rename = "dataURL")]
    #[validate(length(min = 1, message = "dataURL cannot be empty"))]
    pub data_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    pub labels: Vec<String>,
    pub message: String,
}

/// Body of a successful `/save`.
///
/// Drawing clients read the payload from `kwargs`; `status` and `mimetype`
/// are plain body fields and do not reflect the HTTP status line or headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub kwargs: SavePayload,
    pub status: u16,
    pub mimetype: String,
}

impl SaveEnvelope {
    pub fn saved(labels: Vec<String>) -> Self {
        Self {
            kwargs: SavePayload {
                labels,
                message: SAVED_MESSAGE.to_string(),
            },
            status: 200,
            mimetype: "application/json".to_string(),
        }
    }
}
