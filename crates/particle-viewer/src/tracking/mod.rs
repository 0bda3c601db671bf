//! Hand-tracking backend interface.
//!
//! A tracker pulls video frames at its own cadence and delivers one
//! [`HandResults`] per processed frame over an `mpsc` channel. The window
//! thread drains that channel before each redraw and hands every result to
//! the frame driver, so all cloud state is still mutated from one thread.

pub mod sim;

use handcloud::HandResults;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use thiserror::Error;

pub use sim::{SimInput, SimulatedHands};

#[derive(Debug, Error, PartialEq)]
pub enum TrackingError {
    #[error("max_num_hands must be at least 1")]
    NoHands,
    #[error("{name} must lie in [0, 1], got {value}")]
    BadConfidence { name: &'static str, value: f32 },
    #[error("video feed {width}x{height} @ {fps} fps has a zero dimension")]
    EmptyFeed { width: u32, height: u32, fps: u32 },
}

/// Detector settings, in the terms hand-landmark models usually expose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerOptions {
    pub max_num_hands: usize,
    /// Score a new hand needs before it is reported.
    pub min_detection_confidence: f32,
    /// Score an already-tracked hand needs to stay reported.
    pub min_tracking_confidence: f32,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            max_num_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
        }
    }
}

impl TrackerOptions {
    pub fn validate(&self) -> Result<(), TrackingError> {
        if self.max_num_hands == 0 {
            return Err(TrackingError::NoHands);
        }
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrackingError::BadConfidence { name, value });
            }
        }
        Ok(())
    }
}

/// Camera source the tracker reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFeedConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for VideoFeedConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl VideoFeedConfig {
    pub fn validate(&self) -> Result<(), TrackingError> {
        if self.width == 0 || self.height == 0 || self.fps == 0 {
            return Err(TrackingError::EmptyFeed {
                width: self.width,
                height: self.height,
                fps: self.fps,
            });
        }
        Ok(())
    }

    /// Time between processed frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Anything that can turn a video feed into [`HandResults`].
pub trait HandTracker: Send + 'static {
    /// Runs until the receiver hangs up or the source ends.
    fn run(self: Box<Self>, tx: Sender<HandResults>);
}

/// Spawn a tracker on its own thread and return the receiving end.
pub fn spawn_tracker<T: HandTracker>(tracker: T) -> Receiver<HandResults> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("hand-tracker".into())
        .spawn(move || Box::new(tracker).run(tx));
    // Without a tracker the channel is closed and the cloud simply stays idle.
    if let Err(e) = spawned {
        log::error!("Failed to start hand tracker thread: {}", e);
    }
    rx
}
