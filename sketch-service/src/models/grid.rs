use serde::{Deserialize, Serialize};

/// Grid parameters served to the drawing client.
///
/// `width` and `height` are in cells; each cell spans `pixels_per_cell`
/// canvas pixels on a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub width: u32,
    pub height: u32,
    pub pixels_per_cell: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            pixels_per_cell: 12,
        }
    }
}
