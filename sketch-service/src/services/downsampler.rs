//! Canvas-to-grid downsampling.
//!
//! A drawing is collapsed to one pixel per cell by point-sampling each cell's
//! top-left corner, then binarized on the red channel.

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Red values at or above this are background (white); below is ink (black).
pub const INK_THRESHOLD: u8 = 200;

const WHITE: [u8; 3] = [255, 255, 255];

#[derive(Debug, Error)]
pub enum DownsampleError {
    #[error("Cell size must be greater than zero")]
    ZeroCellSize,

    #[error("Drawing is {width}x{height}px, smaller than one {cell}px cell")]
    EmptyGrid { width: u32, height: u32, cell: u32 },

    #[error("Failed to encode grid image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Both stages of a downsampled drawing.
#[derive(Debug, Clone)]
pub struct GridImage {
    /// Sampled cell colors, transparent cells already painted white.
    pub sampled: RgbaImage,
    /// Pure black/white rendition of `sampled`.
    pub thresholded: RgbImage,
}

impl GridImage {
    pub fn width(&self) -> u32 {
        self.thresholded.width()
    }

    pub fn height(&self) -> u32 {
        self.thresholded.height()
    }

    /// PNG bytes of the thresholded grid.
    pub fn encode_png(&self) -> Result<Vec<u8>, DownsampleError> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(self.thresholded.clone())
            .write_to(&mut buffer, ImageOutputFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Number of whole cells across and down. Partial cells at the right and
/// bottom edges are dropped.
pub fn grid_dimensions(width: u32, height: u32, cell: u32) -> Result<(u32, u32), DownsampleError> {
    if cell == 0 {
        return Err(DownsampleError::ZeroCellSize);
    }
    Ok((width / cell, height / cell))
}

/// Sample the top-left pixel of every whole cell.
///
/// Fully transparent samples (alpha == 0) become white; every other sample
/// keeps its RGB. The result is opaque.
pub fn sample_cells(source: &RgbaImage, cell: u32) -> Result<RgbaImage, DownsampleError> {
    let (grid_w, grid_h) = grid_dimensions(source.width(), source.height(), cell)?;

    let sampled = RgbaImage::from_fn(grid_w, grid_h, |gx, gy| {
        let Rgba([r, g, b, a]) = *source.get_pixel(gx * cell, gy * cell);
        let [r, g, b] = if a == 0 { WHITE } else { [r, g, b] };
        Rgba([r, g, b, 255])
    });

    Ok(sampled)
}

/// Classify a red intensity: 1 for background, 0 for ink.
#[inline]
pub fn classify(red: u8) -> u8 {
    if red < INK_THRESHOLD {
        0
    } else {
        1
    }
}

/// Binarize a sampled grid using only the red channel.
pub fn threshold(sampled: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(sampled.width(), sampled.height(), |x, y| {
        let value = classify(sampled.get_pixel(x, y)[0]) * 255;
        Rgb([value, value, value])
    })
}

/// Sample and threshold `source` in one pass over its cells.
pub fn downsample(source: &RgbaImage, cell: u32) -> Result<GridImage, DownsampleError> {
    let sampled = sample_cells(source, cell)?;
    if sampled.width() == 0 || sampled.height() == 0 {
        return Err(DownsampleError::EmptyGrid {
            width: source.width(),
            height: source.height(),
            cell,
        });
    }

    let thresholded = threshold(&sampled);
    Ok(GridImage {
        sampled,
        thresholded,
    })
}
