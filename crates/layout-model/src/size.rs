//! Output sizes.
//!
//! An output size is either a fixed target frame or the "native" sentinel
//! (`width == height == 0`), which keeps each source at its own resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Target frame for a rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputSize {
    /// Human-readable label.
    pub label: String,
    /// Target width in pixels (0 for native).
    pub width: u32,
    /// Target height in pixels (0 for native).
    pub height: u32,
}

/// Largest accepted edge of a fixed output size, in pixels.
pub const MAX_OUTPUT_DIMENSION: u32 = 16_384;

/// Largest surface the compositor will allocate, in pixels.
pub const MAX_CANVAS_PIXELS: u64 = MAX_OUTPUT_DIMENSION as u64 * MAX_OUTPUT_DIMENSION as u64;

/// Built-in presets: `(key, label, width, height)`.
const PRESETS: &[(&str, &str, u32, u32)] = &[
    ("native", "Original size", 0, 0),
    ("square", "Square 1080x1080", 1080, 1080),
    ("portrait", "Portrait 1080x1350", 1080, 1350),
    ("story", "Story 1080x1920", 1080, 1920),
    ("landscape", "Landscape 1200x628", 1200, 628),
    ("banner", "Banner 1500x500", 1500, 500),
    ("full-hd", "Full HD 1920x1080", 1920, 1080),
    ("marketplace", "Marketplace 2000x2000", 2000, 2000),
];

impl OutputSize {
    /// The "use the source's native size" sentinel.
    pub fn native() -> Self {
        Self {
            label: PRESETS[0].1.to_string(),
            width: 0,
            height: 0,
        }
    }

    /// A custom fixed size. Zero on either axis yields the native sentinel.
    ///
    /// Fails when either edge exceeds [`MAX_OUTPUT_DIMENSION`].
    pub fn custom(width: u32, height: u32) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Ok(Self::native());
        }
        if width > MAX_OUTPUT_DIMENSION || height > MAX_OUTPUT_DIMENSION {
            return Err(LayoutError::InvalidOutputSize(format!("{width}x{height}")));
        }
        Ok(Self {
            label: format!("Custom {width}x{height}"),
            width,
            height,
        })
    }

    /// Whether this is the native sentinel.
    pub fn is_native(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Target dimensions, or `None` for the native sentinel.
    pub fn target(&self) -> Option<(u32, u32)> {
        if self.is_native() {
            None
        } else {
            Some((self.width, self.height))
        }
    }

    /// All built-in presets, native first.
    pub fn presets() -> Vec<OutputSize> {
        PRESETS
            .iter()
            .map(|&(_, label, width, height)| OutputSize {
                label: label.to_string(),
                width,
                height,
            })
            .collect()
    }

    /// Preset keys accepted by [`FromStr`], in catalogue order.
    pub fn preset_keys() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|&(key, ..)| key)
    }

    /// Look up a preset by key.
    pub fn preset(key: &str) -> Option<OutputSize> {
        PRESETS
            .iter()
            .find(|&&(k, ..)| k == key)
            .map(|&(_, label, width, height)| OutputSize {
                label: label.to_string(),
                width,
                height,
            })
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{} ({}x{})", self.label, self.width, self.height)
        }
    }
}

impl FromStr for OutputSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "original" {
            return Ok(Self::native());
        }
        if let Some(preset) = Self::preset(&key) {
            return Ok(preset);
        }

        let invalid = || LayoutError::InvalidOutputSize(s.to_string());
        let (w, h) = key.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        match (width, height) {
            (0, 0) => Ok(Self::native()),
            (0, _) | (_, 0) => Err(invalid()),
            _ => Self::custom(width, height).map_err(|_| invalid()),
        }
    }
}
