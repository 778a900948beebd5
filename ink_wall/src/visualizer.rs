//! Window, input polling and the status overlay.
//!
//! A thin wrapper over `minifb`: the app composes a full frame into a
//! `PixelBuffer` and hands it here for presentation.  Key presses are
//! translated to [`KeyAction`]s; the mouse is exposed as a per-frame
//! snapshot so the app can route it to either the simulated tracker or
//! the calibration drag.

use glam::{vec2, Vec2};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use ink_canvas::buffer::argb;
use ink_canvas::PixelBuffer;

/// Default window size; 4:3 to match the tracker's sensor aspect.
pub const WIN_W: usize = 960;
pub const WIN_H: usize = 720;

/// One decoded key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ClearCanvas,        // Space
    ToggleBlendMode,    // E
    ToggleKaleidoscope, // K
    ToggleCalibrate,    // C
    ResetCalibrate,     // R
    ToggleJoints,       // J
    ToggleLines,        // B
    Quit,               // Q / Escape
}

/// Mouse snapshot for one frame, in window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseState {
    pub pos:    Vec2,
    pub left:   bool,
    pub right:  bool,
    pub middle: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    width:  usize,
    height: usize,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        let mut window = Window::new(
            "Ink Wall — Skeletal Trail Canvas",
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, width, height })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Decode this frame's fresh key presses.
    pub fn poll_keys(&mut self) -> Vec<KeyAction> {
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        let mut actions = Vec::new();
        if one_shot(Key::Space)  { actions.push(KeyAction::ClearCanvas); }
        if one_shot(Key::E)      { actions.push(KeyAction::ToggleBlendMode); }
        if one_shot(Key::K)      { actions.push(KeyAction::ToggleKaleidoscope); }
        if one_shot(Key::C)      { actions.push(KeyAction::ToggleCalibrate); }
        if one_shot(Key::R)      { actions.push(KeyAction::ResetCalibrate); }
        if one_shot(Key::J)      { actions.push(KeyAction::ToggleJoints); }
        if one_shot(Key::B)      { actions.push(KeyAction::ToggleLines); }
        if one_shot(Key::Q) || one_shot(Key::Escape) {
            actions.push(KeyAction::Quit);
        }
        actions
    }

    pub fn mouse(&self) -> MouseState {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| vec2(x, y))
            .unwrap_or(Vec2::ZERO);
        MouseState {
            pos,
            left:   self.window.get_mouse_down(MouseButton::Left),
            right:  self.window.get_mouse_down(MouseButton::Right),
            middle: self.window.get_mouse_down(MouseButton::Middle),
        }
    }

    pub fn present(&mut self, frame: &PixelBuffer) -> Result<(), String> {
        self.window
            .update_with_buffer(frame.pixels(), self.width, self.height)
            .map_err(|e| e.to_string())
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Status text — minimal 3×5 bitmap font
// ════════════════════════════════════════════════════════════════════════════

/// Draw `text` at `(x, y)` with 3×5 glyphs (4 px advance).
pub fn draw_label(buf: &mut PixelBuffer, text: &str, x: usize, y: usize, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        for (row, &bits) in glyph3x5(ch).iter().enumerate() {
            for col in 0..3usize {
                if bits & (1 << (2 - col)) != 0 {
                    buf.put(cx + col, y + row, color);
                }
            }
        }
        cx += 4;
        if cx + 4 > buf.width {
            break;
        }
    }
}

/// Status line and key legend across the bottom edge.
pub fn draw_status(buf: &mut PixelBuffer, status: &str) {
    let h = buf.height;
    let bar = argb(0xFF, 0x10, 0x20, 0x30);
    for y in h.saturating_sub(28)..h {
        for x in 0..buf.width {
            buf.put(x, y, bar);
        }
    }
    draw_label(buf, status, 8, h - 24, argb(0xFF, 0xEE, 0xEE, 0xEE));
    draw_label(
        buf,
        "space=clear e=mode k=kaleido c=calibrate r=reset j=joints b=lines q=quit",
        8,
        h - 10,
        argb(0xFF, 0x90, 0x90, 0x90),
    );
}

fn glyph3x5(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_canvas::{OPAQUE_BLACK, OPAQUE_WHITE};

    #[test]
    fn label_marks_pixels() {
        let mut buf = PixelBuffer::new(64, 16, OPAQUE_WHITE);
        draw_label(&mut buf, "ink", 2, 2, OPAQUE_BLACK);
        let dark = (0..64 * 16)
            .filter(|i| buf.get(i % 64, i / 64) == OPAQUE_BLACK)
            .count();
        assert!(dark > 0);
    }

    #[test]
    fn label_clips_at_the_right_edge() {
        let mut buf = PixelBuffer::new(10, 8, OPAQUE_WHITE);
        draw_label(&mut buf, "wwwwwwwwww", 0, 1, OPAQUE_BLACK);
        // must not panic; pixels stay inside
        assert_eq!(buf.get(9, 0), OPAQUE_WHITE);
    }

    #[test]
    fn status_bar_covers_bottom_rows() {
        let mut buf = PixelBuffer::new(120, 60, OPAQUE_WHITE);
        draw_status(&mut buf, "2 users");
        assert_ne!(buf.get(0, 59), OPAQUE_WHITE);
        assert_eq!(buf.get(0, 0), OPAQUE_WHITE);
    }
}
