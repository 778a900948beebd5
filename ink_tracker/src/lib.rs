//! # ink_tracker
//!
//! The boundary between a skeleton tracker and the stroke engine.
//!
//! A tracker backend — real depth-sensor hardware or the built-in
//! pointer simulation — implements [`TrackerSource`] and feeds one
//! channel of [`TrackerMessage`]s.  The consumer cannot tell backends
//! apart:
//!
//! ```text
//!  sensor / sim ──▶ TrackerSource ──mpsc──▶ UserManager ──▶ per-joint Stroke
//!                   (own thread)            conf ≥ 0.9 only
//! ```
//!
//! [`UserManager`] maps tracked users to [`User`]s (one stroke set each),
//! drops low-confidence joint samples, creates users when the tracker
//! finishes calibrating them and destroys them when they are lost.

pub mod joint;
pub mod source;
pub mod user;

pub use joint::JointId;
pub use source::{
    spawn_tracker_source, JointSample, PointerInput, SimTrackerSource, TrackerEvent,
    TrackerMessage, TrackerSource, UserId, CONFIDENCE_MIN, TRACKER_SIZE,
};
pub use user::{TrackerConfig, User, UserManager};
