//! Keyed stroke collection.
//!
//! One [`StrokeManager`] per tracked user.  It exclusively owns its
//! strokes, keyed by integer id: ids below [`GENERATED_ID_BASE`] are
//! caller-supplied (one per meaningful joint), generated ids scan upward
//! from the base so the two ranges never collide.
//!
//! Joints may report before their stroke exists or after it was torn
//! down, so every forwarding call on an unknown id is a silent no-op,
//! never an error.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::calibrate::Calibrate;
use crate::params::StrokeParams;
use crate::stroke::{BrushId, RibbonStrip, Stroke};

/// First id handed out by [`StrokeManager::create_stroke`] when the caller
/// doesn't supply one.
pub const GENERATED_ID_BASE: i32 = 100;

/// Owns all strokes of one user and the tunables they share.
#[derive(Clone, Debug, Default)]
pub struct StrokeManager {
    strokes: BTreeMap<i32, Stroke>,
    params:  StrokeParams,
}

impl StrokeManager {
    pub fn new(params: StrokeParams) -> Self {
        StrokeManager {
            strokes: BTreeMap::new(),
            params,
        }
    }

    /// Create a stroke under `id`, or under a freshly generated id when
    /// `None`.  Idempotent: an existing id is returned as-is without
    /// creating a duplicate.
    pub fn create_stroke(&mut self, id: Option<i32>) -> i32 {
        let id = id.unwrap_or_else(|| self.generate_stroke_id());
        self.strokes.entry(id).or_insert_with(Stroke::new);
        id
    }

    /// Remove a stroke.  No-op when the id is absent.
    pub fn destroy_stroke(&mut self, id: i32) {
        self.strokes.remove(&id);
    }

    pub fn find_stroke(&self, id: i32) -> Option<&Stroke> {
        self.strokes.get(&id)
    }

    /// Latest target for the named stroke; ignored when the id is unknown.
    pub fn add_pos(&mut self, id: i32, pos: Vec2) {
        if let Some(stroke) = self.strokes.get_mut(&id) {
            stroke.add_pos(pos);
        }
    }

    pub fn set_active(&mut self, id: i32, active: bool) {
        if let Some(stroke) = self.strokes.get_mut(&id) {
            stroke.set_active(active);
        }
    }

    pub fn set_brush(&mut self, id: i32, brush: Option<BrushId>) {
        if let Some(stroke) = self.strokes.get_mut(&id) {
            stroke.set_brush(brush);
        }
    }

    /// Advance every stroke one step under the shared parameters.
    pub fn update(&mut self) {
        for stroke in self.strokes.values_mut() {
            stroke.update(&self.params);
        }
    }

    /// Collect ribbon strips from every stroke, advancing each stroke's
    /// draw cursor.  Strokes are independent, so emission order carries
    /// no meaning.
    pub fn draw(&mut self, calibrate: &Calibrate, pivot: Vec2) -> Vec<RibbonStrip> {
        let mut strips = Vec::new();
        for stroke in self.strokes.values_mut() {
            strips.extend(stroke.draw(calibrate, pivot));
        }
        strips
    }

    /// Erase the drawing without forgetting which joints are tracked:
    /// every stroke's points are dropped, the strokes themselves stay.
    pub fn clear(&mut self) {
        for stroke in self.strokes.values_mut() {
            stroke.clear();
        }
    }

    pub fn params(&self) -> &StrokeParams             { &self.params }
    pub fn params_mut(&mut self) -> &mut StrokeParams { &mut self.params }
    pub fn set_params(&mut self, params: StrokeParams) { self.params = params; }
    pub fn stroke_count(&self) -> usize               { self.strokes.len() }
    pub fn stroke_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.strokes.keys().copied()
    }

    fn generate_stroke_id(&self) -> i32 {
        let mut id = GENERATED_ID_BASE;
        while self.strokes.contains_key(&id) {
            id += 1;
        }
        id
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn manager() -> StrokeManager {
        StrokeManager::new(StrokeParams::default())
    }

    #[test]
    fn create_with_explicit_id_is_idempotent() {
        let mut m = manager();
        assert_eq!(m.create_stroke(Some(7)), 7);
        assert_eq!(m.create_stroke(Some(7)), 7);
        assert_eq!(m.stroke_count(), 1);
    }

    #[test]
    fn generated_ids_start_at_base_and_stay_unique() {
        let mut m = manager();
        m.create_stroke(Some(100));
        m.create_stroke(Some(101));
        let id = m.create_stroke(None);
        assert!(id >= GENERATED_ID_BASE);
        assert_eq!(id, 102);
        assert_eq!(m.stroke_count(), 3);

        let next = m.create_stroke(None);
        assert_ne!(next, id);
    }

    #[test]
    fn generated_id_skips_holes_left_by_callers() {
        let mut m = manager();
        m.create_stroke(Some(3));
        let id = m.create_stroke(None);
        assert_eq!(id, GENERATED_ID_BASE);
    }

    #[test]
    fn destroy_absent_id_is_a_no_op() {
        let mut m = manager();
        m.destroy_stroke(42);
        assert_eq!(m.stroke_count(), 0);
    }

    #[test]
    fn forwarding_to_unknown_ids_is_silent() {
        let mut m = manager();
        m.add_pos(9, vec2(0.5, 0.5));
        m.set_active(9, false);
        m.set_brush(9, Some(1));
        m.update();
        assert!(m.find_stroke(9).is_none());
    }

    #[test]
    fn clear_keeps_ids_queryable() {
        let mut m = manager();
        let a = m.create_stroke(Some(1));
        let b = m.create_stroke(None);
        m.set_brush(a, Some(0));
        m.add_pos(a, vec2(0.1, 0.1));
        m.update();
        m.add_pos(a, vec2(0.9, 0.9));
        m.update();
        assert!(!m.find_stroke(a).unwrap().points().is_empty());

        m.clear();
        assert!(m.find_stroke(a).unwrap().points().is_empty());
        assert!(m.find_stroke(b).is_some());
        assert_eq!(m.stroke_count(), 2);
    }

    #[test]
    fn update_pushes_shared_params_into_strokes() {
        let mut m = manager();
        let id = m.create_stroke(Some(0));
        m.params_mut().viewport = vec2(100.0, 100.0);
        m.add_pos(id, vec2(0.5, 0.5));
        m.update();
        // the seeded point lands in viewport pixels
        let p = m.find_stroke(id).unwrap().points()[0].pos;
        assert_eq!(p, vec2(50.0, 50.0));
    }
}
