//! Logomark Render Engine
//!
//! Turns assets and resolved placements into rasters, keeps a live preview
//! in step with the latest render, and drives batch exports.
//!
//! # Pipeline Architecture
//!
//! ```text
//! source.jpg ──┐
//!              ├── Decode ── Fill-scale / crop (canvas geometry)
//! logo.png ────┘                    │
//!                                   ├── Logo overlay (rect, opacity)
//! placement ────────────────────────┘         │
//!                                             ├── Preview (bounded, latest wins)
//!                                             │
//!                                             ▼
//!                                       Encode (PNG)
//!                                             │
//!                                             ▼
//!                                  01.png, 02.png, … → bundle
//! ```

pub mod asset;
pub mod bundle;
pub mod compositor;
pub mod export;
pub mod preview;
pub mod sync;

pub use asset::{AssetId, ImageAsset};
pub use compositor::RenderedFrame;
pub use export::*;
