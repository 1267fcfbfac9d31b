//! Logo placement: anchor presets, placement parameters, and the resolved
//! logo rectangle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{fill_scale, CanvasGeometry};
use crate::size::OutputSize;
use crate::LayoutError;

/// Smallest logo width, as a percentage of canvas width.
pub const MIN_SIZE_PERCENT: u8 = 5;
/// Largest logo width, as a percentage of canvas width.
pub const MAX_SIZE_PERCENT: u8 = 50;
/// Lowest accepted opacity percentage.
pub const MIN_OPACITY: u8 = 10;
/// Fully opaque.
pub const MAX_OPACITY: u8 = 100;

/// One of nine canvas positions on a 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPreset {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Alignment along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlign {
    Start,
    Middle,
    End,
}

impl AxisAlign {
    /// Unclamped position of an item of length `item` on an axis of
    /// length `extent`.
    fn position(self, extent: f64, item: f64, margin: f64) -> f64 {
        match self {
            AxisAlign::Start => margin,
            AxisAlign::Middle => (extent - item) / 2.0,
            AxisAlign::End => extent - item - margin,
        }
    }
}

impl AnchorPreset {
    pub const ALL: [AnchorPreset; 9] = [
        AnchorPreset::TopLeft,
        AnchorPreset::TopCenter,
        AnchorPreset::TopRight,
        AnchorPreset::CenterLeft,
        AnchorPreset::Center,
        AnchorPreset::CenterRight,
        AnchorPreset::BottomLeft,
        AnchorPreset::BottomCenter,
        AnchorPreset::BottomRight,
    ];

    pub fn horizontal(self) -> AxisAlign {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => AxisAlign::Start,
            Self::TopCenter | Self::Center | Self::BottomCenter => AxisAlign::Middle,
            Self::TopRight | Self::CenterRight | Self::BottomRight => AxisAlign::End,
        }
    }

    pub fn vertical(self) -> AxisAlign {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => AxisAlign::Start,
            Self::CenterLeft | Self::Center | Self::CenterRight => AxisAlign::Middle,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => AxisAlign::End,
        }
    }

    /// Canonical kebab-case key.
    pub fn key(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for AnchorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AnchorPreset {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let preset = match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "top-left" | "tl" => Self::TopLeft,
            "top-center" | "top" | "tc" => Self::TopCenter,
            "top-right" | "tr" => Self::TopRight,
            "center-left" | "left" | "cl" => Self::CenterLeft,
            "center" | "middle" | "c" => Self::Center,
            "center-right" | "right" | "cr" => Self::CenterRight,
            "bottom-left" | "bl" => Self::BottomLeft,
            "bottom-center" | "bottom" | "bc" => Self::BottomCenter,
            "bottom-right" | "br" => Self::BottomRight,
            _ => return Err(LayoutError::UnknownAnchor(s.to_string())),
        };
        Ok(preset)
    }
}

/// Where the logo sits: a preset, or a position set by direct manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anchor {
    Preset { preset: AnchorPreset },
    /// Top-left corner in canvas pixels. Kept as-is on recompute.
    Custom { x: f64, y: f64 },
}

impl From<AnchorPreset> for Anchor {
    fn from(preset: AnchorPreset) -> Self {
        Anchor::Preset { preset }
    }
}

/// Compute the top-left corner of a logo anchored at `preset`.
///
/// Both components are clamped to `[0, canvas - logo]`; when the logo is
/// larger than the canvas on an axis the component collapses to 0.
pub fn resolve_anchor(
    preset: AnchorPreset,
    canvas_w: f64,
    canvas_h: f64,
    logo_w: f64,
    logo_h: f64,
    margin: f64,
) -> (f64, f64) {
    let x = preset.horizontal().position(canvas_w, logo_w, margin);
    let y = preset.vertical().position(canvas_h, logo_h, margin);
    (
        x.clamp(0.0, (canvas_w - logo_w).max(0.0)),
        y.clamp(0.0, (canvas_h - logo_h).max(0.0)),
    )
}

/// Logo size for a canvas `canvas_w` wide at `size_percent` of its width.
///
/// Height follows the logo's native aspect ratio. Returns `None` if the
/// native width is zero.
pub fn derive_logo_size(
    canvas_w: f64,
    logo_native_w: u32,
    logo_native_h: u32,
    size_percent: u8,
) -> Option<(f64, f64)> {
    if logo_native_w == 0 {
        return None;
    }
    let width = canvas_w * size_percent as f64 / 100.0;
    let height = width * logo_native_h as f64 / logo_native_w as f64;
    Some((width, height))
}

/// Resolved logo rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogoRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogoRect {
    /// Integer pixel bounds `(x, y, width, height)` used for drawing.
    pub fn pixel_bounds(&self) -> (i64, i64, u32, u32) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }
}

/// User-controlled placement parameters. Setters clamp into range.
///
/// Deserialization goes through the same clamping as [`PlacementParams::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlacementParams")]
pub struct PlacementParams {
    anchor: Anchor,
    margin: u32,
    size_percent: u8,
    opacity: u8,
}

#[derive(Deserialize)]
struct RawPlacementParams {
    anchor: Anchor,
    margin: u32,
    size_percent: u8,
    opacity: u8,
}

impl From<RawPlacementParams> for PlacementParams {
    fn from(raw: RawPlacementParams) -> Self {
        Self::new(raw.anchor, raw.margin, raw.size_percent, raw.opacity)
    }
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            anchor: AnchorPreset::BottomRight.into(),
            margin: 20,
            size_percent: 15,
            opacity: MAX_OPACITY,
        }
    }
}

impl PlacementParams {
    pub fn new(anchor: impl Into<Anchor>, margin: u32, size_percent: u8, opacity: u8) -> Self {
        let mut params = Self::default();
        params.set_anchor(anchor);
        params.set_margin(margin);
        params.set_size_percent(size_percent);
        params.set_opacity(opacity);
        params
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn size_percent(&self) -> u8 {
        self.size_percent
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Opacity as an alpha factor in `[0.1, 1.0]`.
    pub fn alpha(&self) -> f32 {
        self.opacity as f32 / 100.0
    }

    pub fn set_anchor(&mut self, anchor: impl Into<Anchor>) {
        self.anchor = anchor.into();
    }

    pub fn set_margin(&mut self, margin: u32) {
        self.margin = margin;
    }

    pub fn set_size_percent(&mut self, size_percent: u8) {
        self.size_percent = size_percent.clamp(MIN_SIZE_PERCENT, MAX_SIZE_PERCENT);
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
    }
}

/// Canvas geometry and logo rectangle for one source/logo/parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlacement {
    pub canvas: CanvasGeometry,
    pub logo: LogoRect,
}

/// Run the full geometry chain: fill scaling, logo size, anchor position.
///
/// `source` and `logo` are native `(width, height)` pairs. Returns `None`
/// when either has a zero dimension.
pub fn recompute_placement(
    params: &PlacementParams,
    source: (u32, u32),
    logo: (u32, u32),
    output: &OutputSize,
) -> Option<ResolvedPlacement> {
    if logo.1 == 0 {
        return None;
    }
    let canvas = fill_scale(source.0, source.1, output)?;
    let canvas_w = canvas.canvas_width as f64;
    let canvas_h = canvas.canvas_height as f64;
    let (width, height) = derive_logo_size(canvas_w, logo.0, logo.1, params.size_percent)?;

    let (x, y) = match params.anchor {
        Anchor::Preset { preset } => {
            resolve_anchor(preset, canvas_w, canvas_h, width, height, params.margin as f64)
        }
        Anchor::Custom { x, y } => (x, y),
    };

    Some(ResolvedPlacement {
        canvas,
        logo: LogoRect {
            x,
            y,
            width,
            height,
        },
    })
}
