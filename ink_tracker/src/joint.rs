//! Skeletal joint identifiers.
//!
//! The thirteen landmarks the tracker reports.  Ten of them can own an
//! ink stroke; the neck and hips exist only so the body-line overlay can
//! connect the figure:
//!
//! ```text
//!         o            head
//!         |
//! o--o--o---o--o--o    hand–shoulder–neck–shoulder–hand
//!        \ /
//!         o            torso
//!        / \
//!       o   o          hips
//!       |   |
//!       o   o          knees
//!       |   |
//!       o   o          feet
//! ```

/// One tracked skeletal landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JointId {
    Head,
    Neck,
    Torso,
    LeftShoulder,
    RightShoulder,
    LeftHand,
    RightHand,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftFoot,
    RightFoot,
}

impl JointId {
    /// Every joint the tracker reports, in stroke-id order.
    pub const TRACKED: [JointId; 13] = [
        JointId::Head,
        JointId::Neck,
        JointId::Torso,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftHand,
        JointId::RightHand,
        JointId::LeftHip,
        JointId::RightHip,
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftFoot,
        JointId::RightFoot,
    ];

    /// Joints that own a stroke and a visible marker.  Neck and hips are
    /// body-line scaffolding only.
    pub fn has_stroke(self) -> bool {
        !matches!(self, JointId::Neck | JointId::LeftHip | JointId::RightHip)
    }

    /// Caller-supplied stroke id for this joint, stable across runs and
    /// well below the manager's generated-id range.
    pub fn stroke_id(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            JointId::Head => "head",
            JointId::Neck => "neck",
            JointId::Torso => "torso",
            JointId::LeftShoulder => "left shoulder",
            JointId::RightShoulder => "right shoulder",
            JointId::LeftHand => "left hand",
            JointId::RightHand => "right hand",
            JointId::LeftHip => "left hip",
            JointId::RightHip => "right hip",
            JointId::LeftKnee => "left knee",
            JointId::RightKnee => "right knee",
            JointId::LeftFoot => "left foot",
            JointId::RightFoot => "right foot",
        }
    }

    /// Bone segments for the body-line overlay.
    pub fn skeleton_pairs() -> &'static [(JointId, JointId)] {
        &[
            (JointId::LeftHand, JointId::LeftShoulder),
            (JointId::LeftShoulder, JointId::Neck),
            (JointId::RightShoulder, JointId::Neck),
            (JointId::RightHand, JointId::RightShoulder),
            (JointId::Head, JointId::Neck),
            (JointId::LeftShoulder, JointId::Torso),
            (JointId::RightShoulder, JointId::Torso),
            (JointId::Torso, JointId::LeftHip),
            (JointId::Torso, JointId::RightHip),
            (JointId::LeftHip, JointId::RightHip),
            (JointId::LeftHip, JointId::LeftKnee),
            (JointId::RightHip, JointId::RightKnee),
            (JointId::LeftKnee, JointId::LeftFoot),
            (JointId::RightKnee, JointId::RightFoot),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn stroke_ids_are_unique_and_below_generated_range() {
        let ids: BTreeSet<i32> = JointId::TRACKED.iter().map(|j| j.stroke_id()).collect();
        assert_eq!(ids.len(), JointId::TRACKED.len());
        assert!(ids.iter().all(|&id| id < ink_stroke::GENERATED_ID_BASE));
    }

    #[test]
    fn ten_joints_own_strokes() {
        let n = JointId::TRACKED.iter().filter(|j| j.has_stroke()).count();
        assert_eq!(n, 10);
    }

    #[test]
    fn skeleton_pairs_reference_tracked_joints_only() {
        for &(a, b) in JointId::skeleton_pairs() {
            assert!(JointId::TRACKED.contains(&a));
            assert!(JointId::TRACKED.contains(&b));
        }
    }
}
