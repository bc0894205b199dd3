//! Decoding of canvas `toDataURL()` exports.

use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("Data URL has no ',' separating the header from the payload")]
    MissingPayload,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Payload is not a decodable image: {0}")]
    InvalidImage(#[from] image::ImageError),
}

/// Base64 payload of `data:<mime>;base64,<payload>`.
///
/// Only the segment after the first comma is used; anything after a second
/// comma is ignored.
pub fn payload(data_url: &str) -> Result<&str, DataUrlError> {
    data_url.split(',').nth(1).ok_or(DataUrlError::MissingPayload)
}

/// Raw bytes of the payload. Embedded ASCII whitespace (line wrapping) is
/// skipped before decoding.
///
/// Decoding is strict otherwise: any other character outside the standard
/// base64 alphabet, or bad padding, fails with [`DataUrlError::InvalidBase64`].
/// Lenient decoders silently discard such characters; this one does not.
pub fn decode_bytes(data_url: &str) -> Result<Vec<u8>, DataUrlError> {
    let encoded: String = payload(data_url)?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    Ok(general_purpose::STANDARD.decode(encoded)?)
}

/// Decode the payload as an image, whatever container it uses.
pub fn decode_image(data_url: &str) -> Result<DynamicImage, DataUrlError> {
    let bytes = decode_bytes(data_url)?;
    Ok(image::load_from_memory(&bytes)?)
}
