//! Shared stroke tunables.
//!
//! One [`StrokeParams`] is owned per [`StrokeManager`](crate::StrokeManager)
//! and pushed into every stroke on update, so all strokes of one manager
//! track with identical spring characteristics.  The parameter UI layer
//! reads and writes these fields directly each frame.

use glam::{vec2, Vec2};

/// Spring and ribbon-width parameters shared by all strokes of one manager.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeParams {
    /// Spring stiffness `k` in Hooke's law.
    pub stiffness:    f32,
    /// Velocity retained per step; 1.0 would never settle.
    pub damping:      f32,
    /// Ribbon half-width at rest, in output pixels.
    pub min_width:    f32,
    /// Ribbon half-width at or above `max_velocity`, in output pixels.
    pub max_width:    f32,
    /// Pixel speed mapped to `max_width`; faster motion is clamped here.
    pub max_velocity: f32,
    /// Output size in pixels; normalized spring space scales up by this.
    pub viewport:     Vec2,
}

impl Default for StrokeParams {
    fn default() -> Self {
        StrokeParams {
            stiffness:    0.06,
            damping:      0.7,
            min_width:    6.0,
            max_width:    16.0,
            max_velocity: 40.0,
            viewport:     vec2(640.0, 480.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_tuning_range() {
        let p = StrokeParams::default();
        assert!(p.stiffness > 0.0 && p.stiffness < 1.0);
        assert!(p.damping > 0.0 && p.damping < 1.0);
        assert!(p.min_width <= p.max_width);
        assert!(p.max_velocity > 0.0);
    }
}
