//! Top-level application state and the main loop.
//!
//! `AppState` owns the calibration, the accumulation buffers, the brush
//! library, the kaleidoscope and the `UserManager`, and advances them in
//! a fixed order once per display frame.  Everything runs on the render
//! thread; the only other thread is the tracker source feeding the
//! message channel.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use glam::{vec2, Vec2};

use ink_canvas::buffer::{self, argb};
use ink_canvas::{raster, Accumulator, BlendMode, BrushLibrary, Kaleidoscope, PixelBuffer, OPAQUE_BLACK};
use ink_stroke::{Calibrate, DragButton};
use ink_tracker::source::window_to_tracker;
use ink_tracker::{
    spawn_tracker_source, PointerInput, SimTrackerSource, TrackerConfig, TrackerMessage,
    UserManager,
};

use crate::visualizer::{draw_status, KeyAction, MouseState, Visualizer, WIN_H, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    pub width:        usize,
    pub height:       usize,
    /// Directory scanned for brush PNGs.
    pub brush_dir:    PathBuf,
    pub tracker:      TrackerConfig,
    /// Per-frame wash-out toward white in darken-persist mode.
    pub fade:         f32,
    pub mode:         BlendMode,
    pub kaleidoscope: Kaleidoscope,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:        WIN_W,
            height:       WIN_H,
            brush_dir:    PathBuf::from("assets/brushes"),
            tracker:      TrackerConfig::default(),
            fade:         0.002,
            mode:         BlendMode::DarkenPersist,
            kaleidoscope: Kaleidoscope::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── drawing state ────────────────────────────────────────────────────
    calibrate: Calibrate,
    accum:     Accumulator,
    brushes:   BrushLibrary,
    kaleido:   Kaleidoscope,
    users:     UserManager,

    // ── input routing ────────────────────────────────────────────────────
    calibrate_mode: bool,
    pointer_down:   bool,
    last_mouse:     Option<Vec2>,

    // ── presentation ─────────────────────────────────────────────────────
    post:   PixelBuffer, // kaleidoscope target
    frame:  PixelBuffer, // final composed frame
    width:  usize,
    height: usize,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Self {
        let mut tracker = cfg.tracker;
        tracker.params.viewport = vec2(cfg.width as f32, cfg.height as f32);

        let mut accum = Accumulator::new(cfg.width, cfg.height);
        accum.fade = cfg.fade;
        accum.mode = cfg.mode;

        AppState {
            calibrate:      Calibrate::new(),
            accum,
            brushes:        BrushLibrary::load(&cfg.brush_dir),
            kaleido:        cfg.kaleidoscope,
            users:          UserManager::new(tracker),
            calibrate_mode: false,
            pointer_down:   false,
            last_mouse:     None,
            post:           PixelBuffer::new(cfg.width, cfg.height, OPAQUE_BLACK),
            frame:          PixelBuffer::new(cfg.width, cfg.height, OPAQUE_BLACK),
            width:          cfg.width,
            height:         cfg.height,
            status:         "ready - press and drag to draw".to_string(),
        }
    }

    // ── key handling ─────────────────────────────────────────────────────

    pub fn handle_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::ClearCanvas => {
                self.accum.clear();
                self.users.clear_strokes();
                self.status = "canvas cleared".to_string();
            }
            KeyAction::ToggleBlendMode => {
                self.accum.mode = match self.accum.mode {
                    BlendMode::DarkenPersist => BlendMode::Erase,
                    BlendMode::Erase => BlendMode::DarkenPersist,
                };
                self.status = match self.accum.mode {
                    BlendMode::DarkenPersist => "mode: darken-persist".to_string(),
                    BlendMode::Erase => "mode: erase".to_string(),
                };
            }
            KeyAction::ToggleKaleidoscope => {
                self.kaleido.enabled = !self.kaleido.enabled;
                self.status = if self.kaleido.enabled {
                    format!("kaleidoscope: {} lines", self.kaleido.reflection_lines)
                } else {
                    "kaleidoscope: off".to_string()
                };
            }
            KeyAction::ToggleCalibrate => {
                self.calibrate_mode = !self.calibrate_mode;
                self.status = if self.calibrate_mode {
                    "calibrate: left=translate right=scale middle=cover".to_string()
                } else {
                    "calibrate mode off".to_string()
                };
            }
            KeyAction::ResetCalibrate => {
                self.calibrate.reset();
                self.status = "calibration reset".to_string();
            }
            KeyAction::ToggleJoints => {
                self.users.config.show_joints = !self.users.config.show_joints;
            }
            KeyAction::ToggleLines => {
                self.users.config.show_lines = !self.users.config.show_lines;
            }
            KeyAction::Quit => {}
        }
    }

    // ── mouse routing ────────────────────────────────────────────────────

    /// In calibration mode the buttons drive the projection correction;
    /// otherwise the left button feeds the simulated tracker.
    pub fn handle_mouse(&mut self, mouse: &MouseState, ptr_tx: &Sender<PointerInput>) {
        let delta = mouse.pos - self.last_mouse.unwrap_or(mouse.pos);
        self.last_mouse = Some(mouse.pos);

        if self.calibrate_mode {
            // entering calibration mid-draw must not leave a stuck user
            if self.pointer_down {
                self.pointer_down = false;
                let _ = ptr_tx.send(PointerInput::Up);
            }
            if mouse.left {
                self.calibrate.drag(DragButton::Translate, delta);
            } else if mouse.right {
                self.calibrate.drag(DragButton::Scale, delta);
            } else if mouse.middle {
                self.calibrate.drag(DragButton::Cover, delta);
            }
            return;
        }

        let window = vec2(self.width as f32, self.height as f32);
        let tracker_pos = window_to_tracker(mouse.pos, window);
        if mouse.left {
            let input = if self.pointer_down {
                PointerInput::Moved(tracker_pos)
            } else {
                PointerInput::Down(tracker_pos)
            };
            self.pointer_down = true;
            let _ = ptr_tx.send(input);
        } else if self.pointer_down {
            self.pointer_down = false;
            let _ = ptr_tx.send(PointerInput::Up);
        }
    }

    // ── per-frame pipeline ───────────────────────────────────────────────

    /// Ingest → physics → rasterize → blend, in that fixed order.
    pub fn step<I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = TrackerMessage>,
    {
        self.users.begin_frame();
        for msg in messages {
            self.users.handle_message(msg);
        }

        self.users.update();

        self.accum.begin_frame();
        let strips = self.users.draw(&self.calibrate);
        raster::draw_strips(self.accum.scratch_mut(), &strips, &self.brushes);
        self.accum.blend_and_swap();
    }

    /// Post-process and overlay the accumulated frame for presentation.
    pub fn compose(&mut self) -> &PixelBuffer {
        let source = self.accum.front();
        let folded = self.kaleido.process(source, &mut self.post);
        let src = if folded { &self.post } else { source };

        // accumulated ink over a black backdrop; erase mode's knocked-out
        // alpha shows through as black
        for (out, &px) in self.frame.pixels_mut().iter_mut().zip(src.pixels()) {
            let a = buffer::alpha(px);
            let ch = |c: u32| c * a / 255;
            *out = argb(0xFF, ch(buffer::red(px)), ch(buffer::green(px)), ch(buffer::blue(px)));
        }

        self.draw_skeletons();
        self.draw_covers();
        draw_status(&mut self.frame, &self.status);

        &self.frame
    }

    fn draw_skeletons(&mut self) {
        let config = &self.users.config;
        if !config.show_joints && !config.show_lines {
            return;
        }

        let viewport = vec2(self.width as f32, self.height as f32);
        let marker = argb(0x50, 0x20, 0x20, 0x20);
        let radius = config.joint_size * viewport.x / 640.0;
        let calibrate = self.calibrate;

        for (_, user) in self.users.users() {
            let pivot = user.pivot();
            let place = move |p: Vec2| calibrate.transform(p * viewport, pivot);

            if config.show_lines {
                for &(a, b) in ink_tracker::JointId::skeleton_pairs() {
                    if let (Some(pa), Some(pb)) = (user.joint_pos(a), user.joint_pos(b)) {
                        raster::draw_line(&mut self.frame, place(pa), place(pb), marker);
                    }
                }
            }
            if config.show_joints {
                for (joint, pos) in user.joints() {
                    if joint.has_stroke() {
                        raster::fill_circle(&mut self.frame, place(pos), radius, marker);
                    }
                }
            }
        }
    }

    fn draw_covers(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        for rect in [
            self.calibrate.cover_left(),
            self.calibrate.cover_right(),
            self.calibrate.cover_top(),
            self.calibrate.cover_bottom(),
        ] {
            if rect.is_empty() {
                continue;
            }
            raster::fill_rect(
                &mut self.frame,
                (rect.x * w) as usize,
                (rect.y * h) as usize,
                (rect.w * w).ceil() as usize,
                (rect.h * h).ceil() as usize,
                OPAQUE_BLACK,
            );
        }
    }

    // ── accessors for tests and the run loop ─────────────────────────────

    pub fn accumulated(&self) -> &PixelBuffer { self.accum.front() }
    pub fn calibrate(&self) -> &Calibrate     { &self.calibrate }
    pub fn users(&self) -> &UserManager       { &self.users }
    pub fn in_calibrate_mode(&self) -> bool   { self.calibrate_mode }
    pub fn blend_mode(&self) -> BlendMode     { self.accum.mode }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application: window, simulated tracker source, and the
/// per-frame pipeline, until the window closes or quit is pressed.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    let (ptr_tx, ptr_rx) = mpsc::channel::<PointerInput>();
    let tracker_rx = spawn_tracker_source(SimTrackerSource { rx: ptr_rx });

    let mut vis = Visualizer::new(cfg.width, cfg.height)?;
    let mut app = AppState::new(cfg);

    while vis.is_open() {
        for action in vis.poll_keys() {
            if action == KeyAction::Quit {
                return Ok(());
            }
            app.handle_key(action);
        }

        app.handle_mouse(&vis.mouse(), &ptr_tx);

        let messages: Vec<TrackerMessage> = tracker_rx.try_iter().collect();
        app.step(messages);

        let frame = app.compose();
        vis.present(frame)?;
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use ink_canvas::buffer::{alpha, red};
    use ink_canvas::OPAQUE_WHITE;
    use ink_tracker::{JointId, JointSample, TrackerEvent};

    fn small_app() -> AppState {
        AppState::new(AppConfig {
            width: 64,
            height: 48,
            brush_dir: PathBuf::from("/nonexistent-brush-dir"),
            ..AppConfig::default()
        })
    }

    fn hand_sample(x: f32, y: f32) -> TrackerMessage {
        TrackerMessage::Sample(JointSample {
            user:       1,
            joint:      JointId::LeftHand,
            pos:        vec2(x, y),
            confidence: 1.0,
        })
    }

    fn draw_some_ink(app: &mut AppState) {
        app.step([TrackerMessage::Event(TrackerEvent::CalibrationFinished(1))]);
        for i in 0..30 {
            app.step([hand_sample(100.0 + i as f32 * 15.0, 240.0)]);
        }
    }

    fn darkest_pixel(buf: &PixelBuffer) -> u32 {
        let mut min = 0xFF;
        for y in 0..buf.height {
            for x in 0..buf.width {
                min = min.min(red(buf.get(x, y)));
            }
        }
        min
    }

    #[test]
    fn tracked_hand_leaves_ink_on_the_canvas() {
        let mut app = small_app();
        draw_some_ink(&mut app);
        assert!(darkest_pixel(app.accumulated()) < 0xE0);
    }

    #[test]
    fn ink_persists_across_empty_frames() {
        let mut app = small_app();
        draw_some_ink(&mut app);
        let before = darkest_pixel(app.accumulated());
        for _ in 0..5 {
            app.step([]);
        }
        // fade is tiny; ink must still be clearly visible
        assert!(darkest_pixel(app.accumulated()) <= before + 8);
    }

    #[test]
    fn clear_canvas_resets_accumulation() {
        let mut app = small_app();
        draw_some_ink(&mut app);
        app.handle_key(KeyAction::ClearCanvas);
        assert_eq!(app.accumulated().get(10, 10), OPAQUE_WHITE);
        app.step([]);
        assert_eq!(darkest_pixel(app.accumulated()), 0xFF);
    }

    #[test]
    fn erase_mode_knocks_out_alpha_where_ink_lands() {
        let mut app = small_app();
        app.handle_key(KeyAction::ToggleBlendMode);
        assert_eq!(app.blend_mode(), BlendMode::Erase);
        draw_some_ink(&mut app);

        let buf = app.accumulated();
        let min_alpha = (0..buf.height)
            .flat_map(|y| (0..buf.width).map(move |x| (x, y)))
            .map(|(x, y)| alpha(buf.get(x, y)))
            .min()
            .unwrap();
        assert!(min_alpha < 0xFF);
    }

    #[test]
    fn mode_toggle_round_trips() {
        let mut app = small_app();
        app.handle_key(KeyAction::ToggleBlendMode);
        app.handle_key(KeyAction::ToggleBlendMode);
        assert_eq!(app.blend_mode(), BlendMode::DarkenPersist);
    }

    #[test]
    fn calibrate_mode_routes_mouse_to_drag_not_tracker() {
        let mut app = small_app();
        let (tx, rx) = mpsc::channel();

        app.handle_key(KeyAction::ToggleCalibrate);
        assert!(app.in_calibrate_mode());

        app.handle_mouse(
            &MouseState { pos: vec2(10.0, 10.0), left: true, right: false, middle: false },
            &tx,
        );
        app.handle_mouse(
            &MouseState { pos: vec2(25.0, 10.0), left: true, right: false, middle: false },
            &tx,
        );
        assert_eq!(app.calibrate().translate(), vec2(15.0, 0.0));
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn drawing_mouse_feeds_the_pointer_channel() {
        let mut app = small_app();
        let (tx, rx) = mpsc::channel();

        app.handle_mouse(
            &MouseState { pos: vec2(32.0, 24.0), left: true, right: false, middle: false },
            &tx,
        );
        app.handle_mouse(
            &MouseState { pos: vec2(40.0, 24.0), left: true, right: false, middle: false },
            &tx,
        );
        app.handle_mouse(
            &MouseState { pos: vec2(40.0, 24.0), left: false, right: false, middle: false },
            &tx,
        );

        let inputs: Vec<PointerInput> = rx.try_iter().collect();
        assert!(matches!(inputs[0], PointerInput::Down(_)));
        assert!(matches!(inputs[1], PointerInput::Moved(_)));
        assert_eq!(inputs[2], PointerInput::Up);
    }

    #[test]
    fn reset_key_restores_identity_calibration() {
        let mut app = small_app();
        let (tx, _rx) = mpsc::channel();
        app.handle_key(KeyAction::ToggleCalibrate);
        app.handle_mouse(
            &MouseState { pos: vec2(0.0, 0.0), left: true, right: false, middle: false },
            &tx,
        );
        app.handle_mouse(
            &MouseState { pos: vec2(30.0, 30.0), left: true, right: false, middle: false },
            &tx,
        );
        assert_ne!(app.calibrate().translate(), Vec2::ZERO);

        app.handle_key(KeyAction::ResetCalibrate);
        assert_eq!(app.calibrate().translate(), Vec2::ZERO);
    }

    #[test]
    fn compose_runs_with_overlays_and_kaleidoscope() {
        let mut app = small_app();
        draw_some_ink(&mut app);
        app.handle_key(KeyAction::ToggleKaleidoscope);
        let frame = app.compose();
        assert_eq!(frame.width, 64);
        // status bar is drawn
        assert_ne!(frame.get(0, 47), OPAQUE_WHITE);
    }

    #[test]
    fn user_lost_removes_the_user_but_keeps_the_ink() {
        let mut app = small_app();
        draw_some_ink(&mut app);
        app.step([TrackerMessage::Event(TrackerEvent::UserLost(1))]);
        assert_eq!(app.users().user_count(), 0);
        assert!(darkest_pixel(app.accumulated()) < 0xE0);
    }
}
