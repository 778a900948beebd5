//! Kaleidoscope post-process.
//!
//! A fan of reflection lines through a configurable center folds the
//! accumulated frame into mirrored wedges.  Each line is stored as a
//! normalized line equation `n·p + d = 0`; a pixel on the negative side
//! of a line is mirrored across it before sampling the source.  Runs on
//! the presented frame only — accumulation always blends unreflected ink.

use glam::{vec2, Vec2};

use crate::buffer::PixelBuffer;

/// Most reflection lines the fan will build.
pub const MAX_REFLECTION_LINES: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kaleidoscope {
    pub enabled:          bool,
    /// Number of fanned reflection lines, 0–32.
    pub reflection_lines: u32,
    /// Rotation of the whole fan, radians.
    pub rotation:         f32,
    /// Fan center in normalized `[0,1]²` output space.
    pub center:           Vec2,
}

impl Default for Kaleidoscope {
    fn default() -> Self {
        Kaleidoscope {
            enabled:          false,
            reflection_lines: 3,
            rotation:         0.0,
            center:           vec2(0.5, 0.5),
        }
    }
}

impl Kaleidoscope {
    /// Fold `src` into `dst`.  Returns `false` (leaving `dst` untouched)
    /// when disabled or lineless, in which case the caller presents the
    /// source directly.
    pub fn process(&self, src: &PixelBuffer, dst: &mut PixelBuffer) -> bool {
        if !self.enabled || self.reflection_lines == 0 {
            return false;
        }

        let lines = self.build_lines();
        let size = vec2(src.width as f32, src.height as f32);

        for y in 0..src.height {
            for x in 0..src.width {
                let mut p = vec2(x as f32 + 0.5, y as f32 + 0.5) / size;
                for &(n, d) in &lines {
                    let dist = n.dot(p) + d;
                    if dist < 0.0 {
                        p -= 2.0 * dist * n;
                    }
                }
                let sx = ((p.x * size.x) as isize).clamp(0, src.width as isize - 1) as usize;
                let sy = ((p.y * size.y) as isize).clamp(0, src.height as isize - 1) as usize;
                dst.put(x, y, src.get(sx, sy));
            }
        }
        true
    }

    /// Fan of normalized line equations `(n, d)` spaced π/lines apart,
    /// each passing near the center.
    fn build_lines(&self) -> Vec<(Vec2, f32)> {
        let count = self.reflection_lines.min(MAX_REFLECTION_LINES);
        let step = std::f32::consts::PI / count as f32;
        let mut a = self.rotation;
        let mut lines = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let v = vec2(a.cos(), a.sin());
            let p = self.center + 0.3 * v;
            let n = vec2(-v.y, v.x);
            lines.push((n, -p.dot(n)));
            a += step;
        }
        lines
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{OPAQUE_BLACK, OPAQUE_WHITE};

    #[test]
    fn disabled_is_passthrough() {
        let src = PixelBuffer::new(8, 8, OPAQUE_WHITE);
        let mut dst = PixelBuffer::new(8, 8, OPAQUE_BLACK);
        let k = Kaleidoscope::default();
        assert!(!k.process(&src, &mut dst));
        assert_eq!(dst.get(0, 0), OPAQUE_BLACK); // untouched
    }

    #[test]
    fn zero_lines_is_passthrough() {
        let src = PixelBuffer::new(8, 8, OPAQUE_WHITE);
        let mut dst = PixelBuffer::new(8, 8, OPAQUE_BLACK);
        let k = Kaleidoscope { enabled: true, reflection_lines: 0, ..Default::default() };
        assert!(!k.process(&src, &mut dst));
    }

    #[test]
    fn uniform_source_stays_uniform() {
        let src = PixelBuffer::new(16, 16, OPAQUE_WHITE);
        let mut dst = PixelBuffer::new(16, 16, OPAQUE_BLACK);
        let k = Kaleidoscope { enabled: true, ..Default::default() };
        assert!(k.process(&src, &mut dst));
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(dst.get(x, y), OPAQUE_WHITE);
            }
        }
    }

    #[test]
    fn folding_mirrors_content_across_the_fan() {
        // ink only in one corner; after folding, wedges away from that
        // corner pick it up too
        let mut src = PixelBuffer::new(32, 32, OPAQUE_WHITE);
        for y in 0..32 {
            for x in 0..8 {
                src.put(x, y, OPAQUE_BLACK);
            }
        }
        let mut dst = PixelBuffer::new(32, 32, OPAQUE_WHITE);
        let k = Kaleidoscope { enabled: true, reflection_lines: 4, ..Default::default() };
        assert!(k.process(&src, &mut dst));

        let dark = (0..32 * 32)
            .filter(|i| dst.get(i % 32, i / 32) == OPAQUE_BLACK)
            .count();
        assert!(dark > 0, "folded output should contain ink");
    }
}
