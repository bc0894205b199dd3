pub mod data_url;
pub mod downsampler;
pub mod metrics;
pub mod pipeline;
pub mod recognizer;
pub mod storage;

pub use pipeline::SketchPipeline;
pub use recognizer::{load_recognizer, Recognizer, RecognizerError};
pub use storage::GridArtifactStore;
