//! Bounded-size previews of rendered frames.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use logomark_layout_model::geometry::preview_dimensions;

use crate::compositor::RenderedFrame;

/// Resampling filter for previews.
const PREVIEW_FILTER: FilterType = FilterType::CatmullRom;

/// Downscale a frame so its longest edge is at most `max_dimension`.
///
/// Frames already within bounds are copied unchanged; previews never
/// upscale past the full render.
pub fn derive_preview(frame: &RenderedFrame, max_dimension: u32) -> RgbaImage {
    let (width, height) = preview_dimensions(frame.width(), frame.height(), max_dimension);
    if (width, height) == (frame.width(), frame.height()) {
        return frame.image.clone();
    }
    imageops::resize(&frame.image, width, height, PREVIEW_FILTER)
}
