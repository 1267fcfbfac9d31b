//! Canvas geometry: fitting a source image into an output frame.
//!
//! Sources are scaled with a *fill* rule: the larger of the two axis ratios
//! is used so the drawn image always covers the whole canvas, and overflow on
//! the dominant axis is cropped symmetrically.

use serde::{Deserialize, Serialize};

use crate::size::OutputSize;

/// How a source image is laid out on an output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Output canvas width in pixels.
    pub canvas_width: u32,
    /// Output canvas height in pixels.
    pub canvas_height: u32,
    /// Width of the scaled source as drawn (may exceed the canvas).
    pub drawn_width: f64,
    /// Height of the scaled source as drawn (may exceed the canvas).
    pub drawn_height: f64,
    /// Left edge of the drawn source (zero or negative).
    pub offset_x: f64,
    /// Top edge of the drawn source (zero or negative).
    pub offset_y: f64,
    /// Source-to-canvas scale factor.
    pub scale: f64,
}

/// Integer region of a source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute canvas geometry for a source of `source_w` x `source_h` pixels.
///
/// Returns `None` if either source dimension is zero.
pub fn fill_scale(source_w: u32, source_h: u32, target: &OutputSize) -> Option<CanvasGeometry> {
    if source_w == 0 || source_h == 0 {
        return None;
    }

    let Some((canvas_w, canvas_h)) = target.target() else {
        return Some(CanvasGeometry {
            canvas_width: source_w,
            canvas_height: source_h,
            drawn_width: source_w as f64,
            drawn_height: source_h as f64,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        });
    };

    let (sw, sh) = (source_w as f64, source_h as f64);
    let (cw, ch) = (canvas_w as f64, canvas_h as f64);
    let scale = (cw / sw).max(ch / sh);
    let drawn_width = sw * scale;
    let drawn_height = sh * scale;

    Some(CanvasGeometry {
        canvas_width: canvas_w,
        canvas_height: canvas_h,
        drawn_width,
        drawn_height,
        offset_x: (cw - drawn_width) / 2.0,
        offset_y: (ch - drawn_height) / 2.0,
        scale,
    })
}

impl CanvasGeometry {
    /// Whether the source is drawn 1:1 at the origin.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    /// The part of the source that is visible through the canvas.
    ///
    /// Resampling just this window straight to the canvas size avoids
    /// seams from rounding a fractional draw offset.
    pub fn source_crop(&self, source_w: u32, source_h: u32) -> SourceCrop {
        if self.is_identity() {
            return SourceCrop {
                x: 0,
                y: 0,
                width: source_w.min(self.canvas_width),
                height: source_h.min(self.canvas_height),
            };
        }

        let axis = |offset: f64, canvas: u32, source: u32| -> (u32, u32) {
            let start = ((-offset / self.scale).round().max(0.0) as u32).min(source - 1);
            let len = (canvas as f64 / self.scale).round() as u32;
            (start, len.clamp(1, source - start))
        };

        let (x, width) = axis(self.offset_x, self.canvas_width, source_w);
        let (y, height) = axis(self.offset_y, self.canvas_height, source_h);
        SourceCrop {
            x,
            y,
            width,
            height,
        }
    }
}

/// Dimensions of a preview bounded by `max_dimension` on its longest edge.
///
/// Previews only shrink: the scale is capped at 1. Dimensions are floored
/// and never drop below one pixel.
pub fn preview_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let max = max_dimension.max(1);
    let long = width.max(height);
    if long <= max {
        return (width, height);
    }
    // scale = max / long; integer math keeps the floor exact.
    let shrink = |dim: u32| ((dim as u64 * max as u64 / long as u64) as u32).max(1);
    (shrink(width), shrink(height))
}
