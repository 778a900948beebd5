//! One joint's physical ink trail.
//!
//! A [`Stroke`] is a unit mass on a damped spring.  `add_pos` moves the
//! anchor, `update` advances the spring one step and appends a point when
//! the mass moved, `draw` emits the not-yet-rendered tail as textured
//! ribbon strips.  Positions arrive normalized (0–1 tracker space);
//! deposited points are in output pixels.

use glam::{vec2, Vec2};

use crate::calibrate::Calibrate;
use crate::params::StrokeParams;

/// Index into the brush texture library.  Resolved by the renderer.
pub type BrushId = usize;

/// Squared distance under which a non-empty trail stops emitting points.
const SETTLE_EPS_SQ: f32 = 0.001;

/// Bands the ribbon width is split into, to keep brush sampling
/// proportionate on long straight runs.
const WIDTH_SUBDIV: usize = 8;

/// Spring mass.  Kept explicit even though it is unity.
const MASS: f32 = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// StrokePoint
// ════════════════════════════════════════════════════════════════════════════

/// One deposited sample of the trail.  Immutable once appended.
#[derive(Clone, Copy, Debug)]
pub struct StrokePoint {
    /// Position in output pixels.
    pub pos:   Vec2,
    /// Half-width vector: perpendicular to motion, length = ribbon
    /// half-thickness.  Zero when the spring barely moved.
    pub width: Vec2,
    /// Cumulative arc length — the ribbon's U texture coordinate.
    pub u:     f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Ribbon geometry
// ════════════════════════════════════════════════════════════════════════════

/// One calibrated ribbon vertex with its brush texture coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonVertex {
    pub pos: Vec2,
    pub uv:  Vec2,
}

/// One band of a ribbon in triangle-strip vertex order.
#[derive(Clone, Debug)]
pub struct RibbonStrip {
    pub brush: BrushId,
    pub verts: Vec<RibbonVertex>,
}

// ════════════════════════════════════════════════════════════════════════════
// Stroke
// ════════════════════════════════════════════════════════════════════════════

/// Spring-damper trail simulator for a single joint.
#[derive(Clone, Debug)]
pub struct Stroke {
    active:     bool,
    has_target: bool,

    points:     Vec<StrokePoint>,

    pos:        Vec2,  // spring position, normalized space
    target:     Vec2,
    vel:        Vec2,
    u:          f32,   // arc length accumulator

    last_drawn: usize,
    brush:      Option<BrushId>,
}

impl Stroke {
    pub fn new() -> Self {
        Stroke {
            active:     true,
            has_target: false,
            points:     Vec::new(),
            pos:        Vec2::ZERO,
            target:     Vec2::ZERO,
            vel:        Vec2::ZERO,
            u:          0.0,
            last_drawn: 0,
            brush:      None,
        }
    }

    /// Record the latest spring anchor.  Does not advance the simulation.
    pub fn add_pos(&mut self, target: Vec2) {
        self.target = target;
        self.has_target = true;
    }

    /// Advance the spring by one fixed step and deposit a point if the
    /// mass moved.  One call per display frame; there is no delta-time —
    /// the step is coupled to the frame rate on purpose.
    pub fn update(&mut self, params: &StrokeParams) {
        if !self.active || !self.has_target {
            return;
        }

        if self.points.is_empty() {
            // cold start: seed at the anchor so the mass doesn't lurch in
            // from wherever it was before the last clear
            self.pos = self.target;
            self.vel = Vec2::ZERO;
            self.u = 0.0;
            self.last_drawn = 0;
        }

        let d = self.pos - self.target;

        // settled: no new point while the anchor stays put
        if d.length_squared() < SETTLE_EPS_SQ && !self.points.is_empty() {
            return;
        }

        let f = -params.stiffness * d; // Hooke's law
        let a = f / MASS;
        self.vel = (self.vel + a) * params.damping;
        self.pos += self.vel;
        self.u += self.vel.length();

        let dir = self.vel.perp().normalize_or_zero();

        let speed = (self.vel * params.viewport).length();
        let s = speed.clamp(0.0, params.max_velocity);
        let t = if params.max_velocity > f32::EPSILON {
            ease_in_quad(s / params.max_velocity)
        } else {
            0.0
        };
        let half_width = params.min_width + (params.max_width - params.min_width) * t;

        self.points.push(StrokePoint {
            pos:   self.pos * params.viewport,
            width: dir * half_width,
            u:     self.u,
        });
    }

    /// Emit ribbon strips for every point added since the last draw, then
    /// advance the cursor.  The last point is re-emitted as the start of
    /// the next call's strips so consecutive frames stay connected.
    ///
    /// Inactive or brushless strokes emit nothing.
    pub fn draw(&mut self, calibrate: &Calibrate, pivot: Vec2) -> Vec<RibbonStrip> {
        let Some(brush) = self.brush else {
            return Vec::new();
        };
        if !self.active {
            return Vec::new();
        }

        let mut strips = Vec::new();

        if self.points.len() >= 2 {
            let tail = &self.points[self.last_drawn..];
            let coeff_step = 2.0 / WIDTH_SUBDIV as f32;
            let mut coeff = -1.0f32;

            for _ in 0..WIDTH_SUBDIV {
                let c0 = coeff;
                let c1 = coeff + coeff_step;
                let v0 = c0 * 0.5 + 0.5;
                let v1 = c1 * 0.5 + 0.5;

                let mut verts = Vec::with_capacity(tail.len() * 2);
                for p in tail {
                    verts.push(RibbonVertex {
                        pos: calibrate.transform(p.pos + c0 * p.width, pivot),
                        uv:  vec2(p.u, v0),
                    });
                    verts.push(RibbonVertex {
                        pos: calibrate.transform(p.pos + c1 * p.width, pivot),
                        uv:  vec2(p.u, v1),
                    });
                }
                if verts.len() >= 4 {
                    strips.push(RibbonStrip { brush, verts });
                }
                coeff += coeff_step;
            }
        }

        if !self.points.is_empty() {
            self.last_drawn = self.points.len() - 1;
        }

        strips
    }

    /// Deactivation also clears, so a reactivated stroke starts fresh
    /// instead of resuming a stale trail.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            if !self.active {
                self.clear();
            }
        }
    }

    /// Drop the trail.  The next `update` re-seeds from the current
    /// target, so there is no spring snap across the gap.
    pub fn clear(&mut self) {
        self.points.clear();
        self.last_drawn = 0;
    }

    pub fn set_brush(&mut self, brush: Option<BrushId>) {
        self.brush = brush;
    }

    pub fn is_active(&self) -> bool        { self.active }
    pub fn brush(&self) -> Option<BrushId> { self.brush }
    pub fn points(&self) -> &[StrokePoint] { &self.points }
    pub fn position(&self) -> Vec2         { self.pos }
    pub fn velocity(&self) -> Vec2         { self.vel }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new()
    }
}

/// Quadratic ease-in: low speeds bias strongly toward the minimum width.
fn ease_in_quad(t: f32) -> f32 {
    t * t
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
