//! Software rasterizer.
//!
//! Ribbon strips from `ink_stroke` become brush-textured triangles here;
//! the rest is the small set of primitives the overlay needs (circles,
//! lines, rectangles).  Everything writes straight into a
//! [`PixelBuffer`], compositing with source-over.

use glam::Vec2;

use ink_stroke::{RibbonStrip, RibbonVertex};

use crate::brush::{Brush, BrushLibrary};
use crate::buffer::{composite_over, PixelBuffer};

/// Rasterize a batch of ribbon strips.  Strips whose brush id is not in
/// the library are skipped — a stroke with no usable brush draws nothing.
pub fn draw_strips(target: &mut PixelBuffer, strips: &[RibbonStrip], brushes: &BrushLibrary) {
    for strip in strips {
        if let Some(brush) = brushes.get(strip.brush) {
            draw_strip(target, strip, brush);
        }
    }
}

/// Walk a triangle-strip: vertices `i, i+1, i+2` form one triangle each.
pub fn draw_strip(target: &mut PixelBuffer, strip: &RibbonStrip, brush: &Brush) {
    for tri in strip.verts.windows(3) {
        fill_textured_triangle(target, tri[0], tri[1], tri[2], brush);
    }
}

/// Signed double-area of the triangle `a b p`; the edge function.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Edge-function rasterization with affine UV interpolation.  Winding is
/// irrelevant (strips alternate it); degenerate triangles are dropped.
fn fill_textured_triangle(
    target: &mut PixelBuffer,
    v0: RibbonVertex,
    v1: RibbonVertex,
    v2: RibbonVertex,
    brush: &Brush,
) {
    let area = edge(v0.pos, v1.pos, v2.pos);
    if area.abs() < 1e-6 {
        return;
    }

    let min_x = v0.pos.x.min(v1.pos.x).min(v2.pos.x).floor().max(0.0) as usize;
    let min_y = v0.pos.y.min(v1.pos.y).min(v2.pos.y).floor().max(0.0) as usize;
    let max_x = (v0.pos.x.max(v1.pos.x).max(v2.pos.x).ceil() as isize)
        .clamp(0, target.width as isize) as usize;
    let max_y = (v0.pos.y.max(v1.pos.y).max(v2.pos.y).ceil() as isize)
        .clamp(0, target.height as isize) as usize;

    let inv_area = 1.0 / area;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(v1.pos, v2.pos, p) * inv_area;
            let w1 = edge(v2.pos, v0.pos, p) * inv_area;
            let w2 = edge(v0.pos, v1.pos, p) * inv_area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let uv = v0.uv * w0 + v1.uv * w1 + v2.uv * w2;
            let texel = brush.sample(uv.x, uv.y);
            let dst = target.get(x, y);
            target.put(x, y, composite_over(dst, texel));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Overlay primitives
// ════════════════════════════════════════════════════════════════════════════

/// Solid-filled rectangle, clipped to the buffer.  No compositing — this
/// is what the cover masks use.
pub fn fill_rect(target: &mut PixelBuffer, x: usize, y: usize, w: usize, h: usize, color: u32) {
    for row in y..(y + h).min(target.height) {
        for col in x..(x + w).min(target.width) {
            target.put(col, row, color);
        }
    }
}

/// Alpha-composited disc for joint markers.
pub fn fill_circle(target: &mut PixelBuffer, center: Vec2, radius: f32, color: u32) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let min_x = (center.x - radius).floor().max(0.0) as usize;
    let min_y = (center.y - radius).floor().max(0.0) as usize;
    let max_x = ((center.x + radius).ceil() as isize).clamp(0, target.width as isize) as usize;
    let max_y = ((center.y + radius).ceil() as isize).clamp(0, target.height as isize) as usize;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                let dst = target.get(x, y);
                target.put(x, y, composite_over(dst, color));
            }
        }
    }
}

/// Alpha-composited line for the skeleton overlay.
pub fn draw_line(target: &mut PixelBuffer, from: Vec2, to: Vec2, color: u32) {
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil() as usize;
    if steps == 0 {
        plot(target, from, color);
        return;
    }
    let step = delta / steps as f32;
    let mut p = from;
    for _ in 0..=steps {
        plot(target, p, color);
        p += step;
    }
}

#[inline]
fn plot(target: &mut PixelBuffer, p: Vec2, color: u32) {
    if p.x < 0.0 || p.y < 0.0 {
        return;
    }
    let (x, y) = (p.x as usize, p.y as usize);
    let dst = target.get(x, y);
    target.put(x, y, composite_over(dst, color));
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
