//! Tracker sources — hardware or simulation, behind one channel.
//!
//! The public interface is a stream of [`TrackerMessage`]s over `mpsc`.
//! Consumers don't know whether messages come from a depth sensor
//! backend or from the pointer simulator; a hardware backend implements
//! [`TrackerSource`] against its SDK and feeds the same channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use glam::Vec2;

use crate::joint::JointId;

/// Tracker-entity identifier assigned by the backend.
pub type UserId = u32;

/// Joint samples below this confidence are dropped — never zeroed,
/// never interpolated.
pub const CONFIDENCE_MIN: f32 = 0.9;

/// The coordinate space tracker samples arrive in (sensor pixels).
pub const TRACKER_SIZE: Vec2 = Vec2::new(640.0, 480.0);

// ════════════════════════════════════════════════════════════════════════════
// Messages
// ════════════════════════════════════════════════════════════════════════════

/// Lifecycle notification from the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A body entered the sensor's view.
    UserFound(UserId),
    /// A tracked body left the view; its strokes are torn down.
    UserLost(UserId),
    /// Skeleton calibration began; no joints are reliable yet.
    CalibrationStarted(UserId),
    /// Calibration succeeded; joint samples follow.
    CalibrationFinished(UserId),
}

/// One joint position report, in tracker pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointSample {
    pub user:       UserId,
    pub joint:      JointId,
    pub pos:        Vec2,
    pub confidence: f32,
}

/// Everything a tracker backend can say.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackerMessage {
    Event(TrackerEvent),
    Sample(JointSample),
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`TrackerMessage`]s over a channel.
pub trait TrackerSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<TrackerMessage>);
}

/// Spawn a tracker source on its own thread and return the receiving end.
pub fn spawn_tracker_source<T: TrackerSource>(source: T) -> Receiver<TrackerMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackerSource — pointer simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw pointer event from the window, already mapped into tracker pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Moved(Vec2),
    Up,
}

/// Simulated user id for the pointer body.
pub const SIM_USER: UserId = 0;

/// Tracker source driven by pointer input: pressing spawns a one-joint
/// body whose left hand follows the cursor at full confidence, releasing
/// loses it.  The consumer sees the exact message sequence a hardware
/// backend would produce.
pub struct SimTrackerSource {
    pub rx: Receiver<PointerInput>,
}

impl TrackerSource for SimTrackerSource {
    fn run(self: Box<Self>, tx: Sender<TrackerMessage>) {
        let mut down = false;

        let sample = |pos: Vec2| {
            TrackerMessage::Sample(JointSample {
                user:       SIM_USER,
                joint:      JointId::LeftHand,
                pos,
                confidence: 1.0,
            })
        };

        for input in self.rx {
            let sent = match input {
                PointerInput::Down(pos) => {
                    if down {
                        tx.send(sample(pos))
                    } else {
                        down = true;
                        tx.send(TrackerMessage::Event(TrackerEvent::UserFound(SIM_USER)))
                            .and_then(|_| {
                                tx.send(TrackerMessage::Event(
                                    TrackerEvent::CalibrationFinished(SIM_USER),
                                ))
                            })
                            .and_then(|_| tx.send(sample(pos)))
                    }
                }
                PointerInput::Moved(pos) => {
                    if !down {
                        continue;
                    }
                    tx.send(sample(pos))
                }
                PointerInput::Up => {
                    if !down {
                        continue;
                    }
                    down = false;
                    tx.send(TrackerMessage::Event(TrackerEvent::UserLost(SIM_USER)))
                }
            };
            if sent.is_err() {
                return;
            }
        }
    }
}

/// Map a window pixel position into tracker space.
pub fn window_to_tracker(pos: Vec2, window: Vec2) -> Vec2 {
    if window.x <= 0.0 || window.y <= 0.0 {
        return Vec2::ZERO;
    }
    pos / window * TRACKER_SIZE
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
