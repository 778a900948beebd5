//! # ink_stroke
//!
//! Physical ink stroke simulation for joint-tracked drawing installations.
//!
//! Every tracked joint owns a [`Stroke`]: a damped spring chasing a stream
//! of target positions.  Each simulation step the spring advances and, if
//! the mass actually moved, deposits one width-tagged point onto a growing
//! polyline.  [`Stroke::draw`] turns the not-yet-rendered tail of that
//! polyline into textured ribbon strips.
//!
//! ```text
//!   target ─┐  spring     polyline of          ribbon strips
//!           ▼  F = -k·d   width-tagged points  (8 bands across)
//!   ● ─ ─ ─ ○──────────▶  ·──·──·──·──·   ▶   ═══════════════
//!           mass                                ═══════════════
//! ```
//!
//! [`StrokeManager`] owns a keyed set of strokes sharing one
//! [`StrokeParams`]; [`Calibrate`] is the affine projection correction
//! applied to every emitted vertex.
//!
//! The crate is pure state + geometry: no windowing, no rasterization.
//! Rendering lives in `ink_canvas`.

pub mod calibrate;
pub mod manager;
pub mod params;
pub mod stroke;

pub use calibrate::{Calibrate, CoverRect, DragButton};
pub use manager::{StrokeManager, GENERATED_ID_BASE};
pub use params::StrokeParams;
pub use stroke::{BrushId, RibbonStrip, RibbonVertex, Stroke, StrokePoint};
