//! Tracked users and their stroke sets.
//!
//! One [`User`] per tracked body: a `StrokeManager` with one stroke per
//! drawing joint, the last confident position of every joint (for the
//! skeleton overlay), and the torso position used as the calibration
//! pivot.  [`UserManager`] owns the users, the shared tunables, and the
//! per-joint brush selection, and is the single handler for tracker
//! events.

use std::collections::BTreeMap;

use glam::Vec2;

use ink_stroke::{BrushId, Calibrate, RibbonStrip, StrokeManager, StrokeParams};

use crate::joint::JointId;
use crate::source::{JointSample, TrackerEvent, TrackerMessage, UserId, CONFIDENCE_MIN, TRACKER_SIZE};

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Everything the parameter UI tunes: spring characteristics, per-joint
/// brush selection (0 = no stroke), overlay toggles.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    pub params:       StrokeParams,
    /// 1-based brush choice per joint; 0 disables the joint's stroke.
    pub brush_choice: BTreeMap<JointId, usize>,

    pub show_joints:  bool,
    pub show_lines:   bool,
    /// Marker radius at the 640-wide reference size; scaled by viewport.
    pub joint_size:   f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let mut brush_choice = BTreeMap::new();
        for joint in JointId::TRACKED {
            brush_choice.insert(joint, 0);
        }
        // hands are the expressive joints; start with just the left one
        brush_choice.insert(JointId::LeftHand, 1);

        TrackerConfig {
            params: StrokeParams::default(),
            brush_choice,
            show_joints: true,
            show_lines: true,
            joint_size: 5.0,
        }
    }
}

impl TrackerConfig {
    pub fn brush_for(&self, joint: JointId) -> Option<BrushId> {
        let choice = self.brush_choice.get(&joint).copied().unwrap_or(0);
        choice.checked_sub(1)
    }

    pub fn stroke_active(&self, joint: JointId) -> bool {
        self.brush_for(joint).is_some()
    }

    pub fn set_brush_choice(&mut self, joint: JointId, choice: usize) {
        self.brush_choice.insert(joint, choice);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// User
// ════════════════════════════════════════════════════════════════════════════

/// One tracked body: its stroke set and overlay joint positions.
#[derive(Clone, Debug)]
pub struct User {
    strokes: StrokeManager,
    /// Last confident joint positions this frame, normalized 0–1.
    joints:  BTreeMap<JointId, Vec2>,
}

impl User {
    fn new(config: &TrackerConfig) -> Self {
        let mut strokes = StrokeManager::new(config.params);
        for joint in JointId::TRACKED {
            if joint.has_stroke() {
                strokes.create_stroke(Some(joint.stroke_id()));
            }
        }
        User {
            strokes,
            joints: BTreeMap::new(),
        }
    }

    /// Route one confident sample: remember the overlay position and, for
    /// drawing joints, refresh the stroke's activation/brush from the
    /// current config and hand it the new target.
    fn update_joint(&mut self, joint: JointId, pos_norm: Vec2, config: &TrackerConfig) {
        self.joints.insert(joint, pos_norm);

        if joint.has_stroke() {
            let id = joint.stroke_id();
            self.strokes.set_active(id, config.stroke_active(joint));
            self.strokes.set_brush(id, config.brush_for(joint));
            self.strokes.add_pos(id, pos_norm);
        }
    }

    /// Overlay positions go stale the moment a new frame begins; only
    /// joints confirmed this frame are drawn.
    fn clear_markers(&mut self) {
        self.joints.clear();
    }

    fn update(&mut self, params: StrokeParams) {
        self.strokes.set_params(params);
        self.strokes.update();
    }

    fn draw(&mut self, calibrate: &Calibrate) -> Vec<RibbonStrip> {
        let pivot = self.pivot();
        self.strokes.draw(calibrate, pivot)
    }

    /// Calibration pivot in output pixels: the torso when it was seen
    /// this frame, the viewport center otherwise.
    pub fn pivot(&self) -> Vec2 {
        let viewport = self.strokes.params().viewport;
        match self.joints.get(&JointId::Torso) {
            Some(&torso) => torso * viewport,
            None => viewport * 0.5,
        }
    }

    pub fn joints(&self) -> impl Iterator<Item = (JointId, Vec2)> + '_ {
        self.joints.iter().map(|(&j, &p)| (j, p))
    }

    pub fn joint_pos(&self, joint: JointId) -> Option<Vec2> {
        self.joints.get(&joint).copied()
    }

    pub fn strokes(&self) -> &StrokeManager {
        &self.strokes
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UserManager
// ════════════════════════════════════════════════════════════════════════════

/// Keyed set of tracked users plus the shared configuration.
#[derive(Clone, Debug)]
pub struct UserManager {
    users:      BTreeMap<UserId, User>,
    pub config: TrackerConfig,
}

impl UserManager {
    pub fn new(config: TrackerConfig) -> Self {
        UserManager {
            users: BTreeMap::new(),
            config,
        }
    }

    /// Single entry point for tracker lifecycle notifications.
    pub fn handle_event(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::UserFound(id) => {
                println!("tracker: found user {}", id);
            }
            TrackerEvent::CalibrationStarted(id) => {
                println!("tracker: calibrating user {}", id);
            }
            TrackerEvent::CalibrationFinished(id) => {
                println!("tracker: user {} calibrated", id);
                self.create_user(id);
            }
            TrackerEvent::UserLost(id) => {
                println!("tracker: lost user {}", id);
                self.destroy_user(id);
            }
        }
    }

    /// Route one joint sample.  Below-threshold confidence and unknown
    /// users are dropped silently — both are expected during tracking
    /// start/stop races.
    pub fn ingest(&mut self, sample: JointSample) {
        if sample.confidence < CONFIDENCE_MIN {
            return;
        }
        let pos_norm = sample.pos / TRACKER_SIZE;
        if let Some(user) = self.users.get_mut(&sample.user) {
            user.update_joint(sample.joint, pos_norm, &self.config);
        }
    }

    /// Convenience for the app's message pump.
    pub fn handle_message(&mut self, msg: TrackerMessage) {
        match msg {
            TrackerMessage::Event(event) => self.handle_event(event),
            TrackerMessage::Sample(sample) => self.ingest(sample),
        }
    }

    /// Invalidate overlay markers before this frame's samples arrive.
    pub fn begin_frame(&mut self) {
        for user in self.users.values_mut() {
            user.clear_markers();
        }
    }

    /// Advance every user's stroke physics one step.
    pub fn update(&mut self) {
        for user in self.users.values_mut() {
            user.update(self.config.params);
        }
    }

    /// Collect this frame's fresh ribbon geometry across all users.
    pub fn draw(&mut self, calibrate: &Calibrate) -> Vec<RibbonStrip> {
        let mut strips = Vec::new();
        for user in self.users.values_mut() {
            strips.extend(user.draw(calibrate));
        }
        strips
    }

    /// Erase every user's drawing; tracking state is untouched.
    pub fn clear_strokes(&mut self) {
        for user in self.users.values_mut() {
            user.strokes.clear();
        }
    }

    fn create_user(&mut self, id: UserId) {
        self.users
            .entry(id)
            .or_insert_with(|| User::new(&self.config));
    }

    fn destroy_user(&mut self, id: UserId) {
        self.users.remove(&id);
    }

    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = (UserId, &User)> {
        self.users.iter().map(|(&id, u)| (id, u))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn sample(user: UserId, joint: JointId, pos: Vec2, confidence: f32) -> JointSample {
        JointSample { user, joint, pos, confidence }
    }

    fn calibrated_manager() -> UserManager {
        let mut m = UserManager::new(TrackerConfig::default());
        m.handle_event(TrackerEvent::CalibrationFinished(1));
        m
    }

    #[test]
    fn calibration_finished_creates_user_with_joint_strokes() {
        let m = calibrated_manager();
        let user = m.find_user(1).unwrap();
        assert_eq!(user.strokes().stroke_count(), 10);
        assert!(user
            .strokes()
            .find_stroke(JointId::LeftHand.stroke_id())
            .is_some());
        assert!(user
            .strokes()
            .find_stroke(JointId::Neck.stroke_id())
            .is_none());
    }

    #[test]
    fn creating_the_same_user_twice_keeps_its_strokes() {
        let mut m = calibrated_manager();
        m.ingest(sample(1, JointId::LeftHand, vec2(320.0, 240.0), 1.0));
        m.update();
        m.handle_event(TrackerEvent::CalibrationFinished(1));
        let stroke = m
            .find_user(1)
            .unwrap()
            .strokes()
            .find_stroke(JointId::LeftHand.stroke_id())
            .unwrap();
        assert!(!stroke.points().is_empty());
    }

    #[test]
    fn user_lost_destroys_the_user() {
        let mut m = calibrated_manager();
        m.handle_event(TrackerEvent::UserLost(1));
        assert!(m.find_user(1).is_none());
        // losing an unknown user is a no-op
        m.handle_event(TrackerEvent::UserLost(99));
    }

    #[test]
    fn low_confidence_samples_are_dropped_not_zeroed() {
        let mut m = calibrated_manager();
        m.ingest(sample(1, JointId::LeftHand, vec2(320.0, 240.0), 0.89));
        assert!(m.find_user(1).unwrap().joint_pos(JointId::LeftHand).is_none());

        m.ingest(sample(1, JointId::LeftHand, vec2(320.0, 240.0), 0.95));
        let p = m.find_user(1).unwrap().joint_pos(JointId::LeftHand).unwrap();
        assert_eq!(p, vec2(0.5, 0.5));
    }

    #[test]
    fn samples_for_unknown_users_are_ignored() {
        let mut m = UserManager::new(TrackerConfig::default());
        m.ingest(sample(7, JointId::Head, vec2(100.0, 100.0), 1.0));
        assert_eq!(m.user_count(), 0);
    }

    #[test]
    fn begin_frame_invalidates_markers() {
        let mut m = calibrated_manager();
        m.ingest(sample(1, JointId::Head, vec2(320.0, 100.0), 1.0));
        assert!(m.find_user(1).unwrap().joint_pos(JointId::Head).is_some());
        m.begin_frame();
        assert!(m.find_user(1).unwrap().joint_pos(JointId::Head).is_none());
    }

    #[test]
    fn torso_becomes_the_pivot() {
        let mut m = calibrated_manager();
        let viewport = m.config.params.viewport;
        assert_eq!(m.find_user(1).unwrap().pivot(), viewport * 0.5);

        m.ingest(sample(1, JointId::Torso, vec2(160.0, 120.0), 1.0));
        m.update();
        assert_eq!(m.find_user(1).unwrap().pivot(), vec2(0.25, 0.25) * viewport);
    }

    #[test]
    fn disabled_joints_do_not_accumulate_points() {
        let mut m = calibrated_manager();
        // right hand defaults to brush choice 0 = off
        for i in 0..20 {
            m.begin_frame();
            m.ingest(sample(1, JointId::RightHand, vec2(i as f32 * 20.0, 240.0), 1.0));
            m.update();
        }
        let stroke = m
            .find_user(1)
            .unwrap()
            .strokes()
            .find_stroke(JointId::RightHand.stroke_id())
            .unwrap();
        assert!(stroke.points().is_empty());
    }

    #[test]
    fn active_joint_draws_fresh_geometry() {
        let mut m = calibrated_manager();
        let cal = Calibrate::new();
        for i in 0..10 {
            m.begin_frame();
            m.ingest(sample(1, JointId::LeftHand, vec2(i as f32 * 60.0, 240.0), 1.0));
            m.update();
        }
        let strips = m.draw(&cal);
        assert!(!strips.is_empty());
        // a second draw with no new physics emits nothing
        assert!(m.draw(&cal).is_empty());
    }

    #[test]
    fn clear_strokes_keeps_users_and_ids() {
        let mut m = calibrated_manager();
        for i in 0..10 {
            m.begin_frame();
            m.ingest(sample(1, JointId::LeftHand, vec2(i as f32 * 60.0, 240.0), 1.0));
            m.update();
        }
        m.clear_strokes();
        let user = m.find_user(1).unwrap();
        assert_eq!(user.strokes().stroke_count(), 10);
        assert!(user
            .strokes()
            .find_stroke(JointId::LeftHand.stroke_id())
            .unwrap()
            .points()
            .is_empty());
    }
}
