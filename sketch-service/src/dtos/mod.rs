pub mod save;

pub use save::{SaveEnvelope, SavePayload, SaveRequest, SAVED_MESSAGE};
