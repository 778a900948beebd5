//! Ping-pong frame accumulation.
//!
//! Three same-sized buffers: a scratch target that receives only this
//! frame's fresh ink, and two history buffers of which exactly one is
//! "front" at any time.  Each frame the front history and the scratch
//! blend into the back history, then the roles swap — so accumulation
//! never reads and writes the same buffer.

use crate::buffer::{self, PixelBuffer, OPAQUE_WHITE, TRANSPARENT};

/// How fresh ink combines with the accumulated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Ink accumulates and darkens; a non-zero fade slowly washes the
    /// whole frame back toward white.  The long-exposure look.
    DarkenPersist,
    /// Fresh ink subtracts from the accumulated alpha instead of adding
    /// pigment.  The wipe look.
    Erase,
}

/// Double-buffered accumulation target.
#[derive(Clone, Debug)]
pub struct Accumulator {
    history: [PixelBuffer; 2],
    scratch: PixelBuffer,
    front:   bool,

    /// Per-frame wash-out toward white, 0.0 = never lightens.
    pub fade: f32,
    pub mode: BlendMode,
}

impl Accumulator {
    pub fn new(width: usize, height: usize) -> Self {
        Accumulator {
            history: [
                PixelBuffer::new(width, height, OPAQUE_WHITE),
                PixelBuffer::new(width, height, OPAQUE_WHITE),
            ],
            scratch: PixelBuffer::new(width, height, OPAQUE_WHITE),
            front:   false,
            fade:    0.0,
            mode:    BlendMode::DarkenPersist,
        }
    }

    /// Prepare the scratch buffer for this frame's ink: white base for
    /// darkening, transparent base for erasing.
    pub fn begin_frame(&mut self) {
        match self.mode {
            BlendMode::DarkenPersist => self.scratch.fill(OPAQUE_WHITE),
            BlendMode::Erase => self.scratch.fill(TRANSPARENT),
        }
    }

    /// The buffer fresh ribbons are rasterized into.
    pub fn scratch_mut(&mut self) -> &mut PixelBuffer {
        &mut self.scratch
    }

    /// Fold scratch into history and flip the ping-pong flag.  Exactly
    /// one swap per frame.
    pub fn blend_and_swap(&mut self) {
        let (a, b) = self.history.split_at_mut(1);
        let (front, back) = if self.front {
            (&b[0], &mut a[0])
        } else {
            (&a[0], &mut b[0])
        };

        let fade = self.fade.clamp(0.0, 1.0);
        match self.mode {
            BlendMode::DarkenPersist => {
                for ((out, &hist), &ink) in back
                    .pixels_mut()
                    .iter_mut()
                    .zip(front.pixels())
                    .zip(self.scratch.pixels())
                {
                    *out = darken_persist(hist, ink, fade);
                }
            }
            BlendMode::Erase => {
                for ((out, &hist), &ink) in back
                    .pixels_mut()
                    .iter_mut()
                    .zip(front.pixels())
                    .zip(self.scratch.pixels())
                {
                    *out = erase(hist, ink);
                }
            }
        }

        self.front = !self.front;
    }

    /// The accumulated frame to present.
    pub fn front(&self) -> &PixelBuffer {
        &self.history[self.front as usize]
    }

    /// Reset both history buffers to the white base and return the
    /// ping-pong to its starting side in one step, so no frame can see
    /// one cleared and one stale buffer.
    pub fn clear(&mut self) {
        self.history[0].fill(OPAQUE_WHITE);
        self.history[1].fill(OPAQUE_WHITE);
        self.front = false;
    }

    pub fn width(&self) -> usize  { self.scratch.width }
    pub fn height(&self) -> usize { self.scratch.height }
}

/// `min(history, ink)` per channel, then faded toward white.
#[inline]
fn darken_persist(hist: u32, ink: u32, fade: f32) -> u32 {
    let ch = |h: u32, i: u32| {
        let m = h.min(i);
        m + ((255 - m) as f32 * fade) as u32
    };
    buffer::argb(
        0xFF,
        ch(buffer::red(hist), buffer::red(ink)),
        ch(buffer::green(hist), buffer::green(ink)),
        ch(buffer::blue(hist), buffer::blue(ink)),
    )
}

/// History pigment survives; fresh ink coverage knocks alpha out.
#[inline]
fn erase(hist: u32, ink: u32) -> u32 {
    let a = buffer::alpha(hist).saturating_sub(buffer::alpha(ink));
    buffer::argb(a, buffer::red(hist), buffer::green(hist), buffer::blue(hist))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{alpha, red, OPAQUE_BLACK};

    fn ink_frame(acc: &mut Accumulator, x: usize, y: usize, color: u32) {
        acc.begin_frame();
        acc.scratch_mut().put(x, y, color);
        acc.blend_and_swap();
    }

    #[test]
    fn darken_with_zero_fade_is_monotonic() {
        let mut acc = Accumulator::new(4, 4);
        ink_frame(&mut acc, 1, 1, 0xFF80_8080);
        let after_first = red(acc.front().get(1, 1));
        assert_eq!(after_first, 0x80);

        // frames with no ink must never lighten the darkened pixel
        for _ in 0..10 {
            acc.begin_frame();
            acc.blend_and_swap();
            assert!(red(acc.front().get(1, 1)) <= after_first);
        }

        // darker ink still wins
        ink_frame(&mut acc, 1, 1, 0xFF20_2020);
        assert_eq!(red(acc.front().get(1, 1)), 0x20);

        // lighter ink does not
        ink_frame(&mut acc, 1, 1, 0xFFF0_F0F0);
        assert_eq!(red(acc.front().get(1, 1)), 0x20);
    }

    #[test]
    fn fade_washes_toward_white() {
        let mut acc = Accumulator::new(2, 2);
        ink_frame(&mut acc, 0, 0, OPAQUE_BLACK);
        acc.fade = 0.5;
        acc.begin_frame();
        acc.blend_and_swap();
        let r = red(acc.front().get(0, 0));
        assert!(r > 0, "faded pixel should lighten, got {r:#x}");
        acc.begin_frame();
        acc.blend_and_swap();
        assert!(red(acc.front().get(0, 0)) > r);
    }

    #[test]
    fn erase_mode_knocks_out_alpha() {
        let mut acc = Accumulator::new(2, 2);
        acc.mode = BlendMode::Erase;
        assert_eq!(alpha(acc.front().get(0, 0)), 0xFF);

        ink_frame(&mut acc, 0, 0, 0x8000_0000);
        assert_eq!(alpha(acc.front().get(0, 0)), 0x7F);

        ink_frame(&mut acc, 0, 0, 0xFF00_0000);
        assert_eq!(alpha(acc.front().get(0, 0)), 0x00);

        // untouched pixels keep their alpha
        assert_eq!(alpha(acc.front().get(1, 1)), 0xFF);
    }

    #[test]
    fn swap_happens_exactly_once_per_blend() {
        let mut acc = Accumulator::new(2, 2);
        let side0 = acc.front() as *const PixelBuffer;
        acc.begin_frame();
        acc.blend_and_swap();
        let side1 = acc.front() as *const PixelBuffer;
        assert_ne!(side0, side1);
        acc.begin_frame();
        acc.blend_and_swap();
        assert_eq!(acc.front() as *const PixelBuffer, side0);
    }

    #[test]
    fn clear_resets_both_sides_and_the_flag() {
        let mut acc = Accumulator::new(2, 2);
        ink_frame(&mut acc, 0, 0, OPAQUE_BLACK);
        let flipped = acc.front() as *const PixelBuffer;

        acc.clear();
        assert_eq!(acc.front().get(0, 0), OPAQUE_WHITE);
        // the side that was back when we cleared is white too
        acc.begin_frame();
        acc.blend_and_swap();
        assert_eq!(acc.front().get(0, 0), OPAQUE_WHITE);
        // flag returned to the starting side
        acc.clear();
        assert_ne!(acc.front() as *const PixelBuffer, flipped);
    }

    #[test]
    fn begin_frame_base_depends_on_mode() {
        let mut acc = Accumulator::new(2, 2);
        acc.scratch_mut().fill(OPAQUE_BLACK);
        acc.begin_frame();
        assert_eq!(acc.scratch_mut().get(0, 0), OPAQUE_WHITE);

        acc.mode = BlendMode::Erase;
        acc.begin_frame();
        assert_eq!(acc.scratch_mut().get(0, 0), TRANSPARENT);
    }
}
