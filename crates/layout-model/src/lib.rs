//! Logomark Layout Model
//!
//! Pure geometry for logo compositing:
//! - **Output sizes:** The preset catalogue plus the "native" sentinel
//! - **Canvas geometry:** Fill-and-crop scaling of a source into a target frame
//! - **Placement:** Anchor presets, margin, size and opacity parameters, and
//!   the resolved logo rectangle derived from them
//!
//! All coordinates are in canvas pixels with `(0, 0)` at the top-left.
//! This crate does no I/O and holds no image data.

pub mod geometry;
pub mod placement;
pub mod size;

pub use geometry::*;
pub use placement::*;
pub use size::*;

/// Errors raised while parsing layout values from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Unknown output size '{0}' (use 'native', a preset name, or WIDTHxHEIGHT)")]
    InvalidOutputSize(String),

    #[error("Unknown anchor '{0}' (use e.g. top-left, center, bottom-right, tl, br)")]
    UnknownAnchor(String),
}
