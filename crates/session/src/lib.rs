//! Logomark Session
//!
//! Holds the working set of a compositing session (sources, logo,
//! placement, output size, active item) and wires it to the render engine:
//!
//! - [`Session`]: synchronous state transitions with explicit placement
//!   recompute after every geometry-affecting change
//! - [`Studio`]: renders the active item and publishes it to the preview
//!   synchronizer; runs batch exports over the session's sources

pub mod session;
pub mod studio;

pub use session::{RenderRequest, Session};
pub use studio::Studio;
