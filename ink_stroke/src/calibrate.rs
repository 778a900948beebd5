//! Projection calibration.
//!
//! An installation's projector never lines up perfectly with the sensor's
//! view, so every drawn point passes through this affine correction before
//! rasterization.  Scale is applied around a pivot — typically the tracked
//! body's torso — so a correction dialed in once stays visually stable as
//! the subject walks across the frame.
//!
//! The only input modality is a mouse drag: one button per knob
//! (translate / scale / edge covers).  Covers are normalized fractions of
//! the output extent, filled solid by the presenter to mask uncalibrated
//! projection edges.

use glam::Vec2;

const MIN_TRANSLATE:  f32 = -1000.0;
const MAX_TRANSLATE:  f32 = 1000.0;
const STEP_TRANSLATE: f32 = 1.0;

const MIN_SCALE:  f32 = 0.1;
const MAX_SCALE:  f32 = 10.0;
const STEP_SCALE: f32 = 0.001;

// one pixel of drag on a 400-pixel reference edge
const STEP_COVER: f32 = 1.0 / 400.0;

/// Which mouse button a calibration drag arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragButton {
    /// Primary button: pointer delta moves translate.
    Translate,
    /// Secondary button: pointer delta moves scale.
    Scale,
    /// Middle button: pointer delta grows the edge covers symmetrically.
    Cover,
}

/// Axis-aligned rectangle in normalized `[0,1]²` output space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CoverRect {
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Calibrate
// ════════════════════════════════════════════════════════════════════════════

/// Pivoted translate/scale correction plus four edge cover fractions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibrate {
    translate: Vec2,
    scale:     Vec2,

    cover_left:   f32,
    cover_right:  f32,
    cover_top:    f32,
    cover_bottom: f32,
}

impl Calibrate {
    /// Identity transform, no covers.
    pub fn new() -> Self {
        Calibrate {
            translate:    Vec2::ZERO,
            scale:        Vec2::ONE,
            cover_left:   0.0,
            cover_right:  0.0,
            cover_top:    0.0,
            cover_bottom: 0.0,
        }
    }

    /// Apply the correction to an output-space point, scaling around
    /// `pivot` instead of the origin.
    pub fn transform(&self, pos: Vec2, pivot: Vec2) -> Vec2 {
        (pos - pivot) * self.scale + self.translate + pivot
    }

    /// Feed one pointer drag delta (in pixels) into the knob selected by
    /// the held button.  Covers move symmetrically: left follows right,
    /// top follows bottom.
    pub fn drag(&mut self, button: DragButton, delta: Vec2) {
        match button {
            DragButton::Translate => {
                self.translate.x =
                    (self.translate.x + delta.x * STEP_TRANSLATE).clamp(MIN_TRANSLATE, MAX_TRANSLATE);
                self.translate.y =
                    (self.translate.y + delta.y * STEP_TRANSLATE).clamp(MIN_TRANSLATE, MAX_TRANSLATE);
            }
            DragButton::Scale => {
                self.scale.x = (self.scale.x + delta.x * STEP_SCALE).clamp(MIN_SCALE, MAX_SCALE);
                self.scale.y = (self.scale.y + delta.y * STEP_SCALE).clamp(MIN_SCALE, MAX_SCALE);
            }
            DragButton::Cover => {
                self.cover_left = (self.cover_left + delta.x * STEP_COVER).clamp(0.0, 1.0);
                self.cover_right = self.cover_left;
                self.cover_top = (self.cover_top + delta.y * STEP_COVER).clamp(0.0, 1.0);
                self.cover_bottom = self.cover_top;
            }
        }
    }

    /// Back to identity, covers retracted.
    pub fn reset(&mut self) {
        *self = Calibrate::new();
    }

    pub fn cover_left(&self) -> CoverRect {
        CoverRect { x: 0.0, y: 0.0, w: self.cover_left, h: 1.0 }
    }

    pub fn cover_right(&self) -> CoverRect {
        CoverRect { x: 1.0 - self.cover_right, y: 0.0, w: self.cover_right, h: 1.0 }
    }

    pub fn cover_top(&self) -> CoverRect {
        CoverRect { x: 0.0, y: 0.0, w: 1.0, h: self.cover_top }
    }

    pub fn cover_bottom(&self) -> CoverRect {
        CoverRect { x: 0.0, y: 1.0 - self.cover_bottom, w: 1.0, h: self.cover_bottom }
    }

    pub fn translate(&self) -> Vec2 { self.translate }
    pub fn scale(&self) -> Vec2     { self.scale }

    pub fn set_translate(&mut self, t: Vec2) {
        self.translate = t.clamp(Vec2::splat(MIN_TRANSLATE), Vec2::splat(MAX_TRANSLATE));
    }

    pub fn set_scale(&mut self, s: Vec2) {
        self.scale = s.clamp(Vec2::splat(MIN_SCALE), Vec2::splat(MAX_SCALE));
    }
}

impl Default for Calibrate {
    fn default() -> Self {
        Self::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
