//! # ink_canvas
//!
//! Software compositing layer for the ink trail installation.
//!
//! Fresh ribbon geometry from `ink_stroke` is rasterized into a scratch
//! buffer each frame, then folded into a pair of ping-pong history
//! buffers by the [`Accumulator`]:
//!
//! ```text
//!            ┌─────────┐ rasterize ┌─────────┐
//!  ribbons ─▶│ scratch │──────────▶│  blend  │──▶ history[back]
//!            └─────────┘           └────▲────┘        │ swap
//!                                       │             ▼
//!                               history[front] ◀── present
//! ```
//!
//! Two blend modes: **darken-persist** (ink accumulates, optionally
//! washing out toward white) and **erase** (fresh ink subtracts from the
//! accumulated alpha).  A [`Kaleidoscope`] post-process and the brush
//! texture library round out the crate.

pub mod accum;
pub mod brush;
pub mod buffer;
pub mod kaleidoscope;
pub mod raster;

pub use accum::{Accumulator, BlendMode};
pub use brush::{Brush, BrushLibrary};
pub use buffer::{PixelBuffer, OPAQUE_BLACK, OPAQUE_WHITE, TRANSPARENT};
pub use kaleidoscope::Kaleidoscope;
