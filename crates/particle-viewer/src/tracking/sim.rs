//! Simulated hand tracker, driven by mouse and keyboard input from the
//! viewer window.
//!
//! The window forwards raw [`SimInput`] events; this tracker keeps the latest
//! pose and, once per video frame, emits the landmark set a camera tracker
//! would have produced for that pose. Consumers can't tell it apart from a
//! real backend.
//!
//! Controls:
//! - cursor: wrist position (leaving the window hides the hand)
//! - scroll wheel: spread or close thumb and index
//! - Space (held): pinch
//! - L: toggle a low-confidence hand, as in poor lighting

use super::{HandTracker, TrackerOptions, VideoFeedConfig};
use handcloud::landmarks::{
    Hand, HandResults, Landmark, FINGER_BASES, HAND_LANDMARK_COUNT, INDEX_MCP, INDEX_TIP,
    THUMB_CMC, THUMB_TIP,
};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Instant;

/// Finger gap at startup: the neutral pinch, so the cloud starts at scale 1.
const START_GAP: f32 = 0.25;
const PINCHED_GAP: f32 = 0.02;
/// Gap change per scroll line.
const GAP_STEP: f32 = 0.02;
const MAX_GAP: f32 = 0.6;

const CLEAR_SCORE: f32 = 0.95;
const LOW_SCORE: f32 = 0.5;

/// Wrist to fingertip, in normalized image units.
const HAND_LENGTH: f32 = 0.18;
const PALM_LENGTH: f32 = 0.10;

/// Raw input event from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor position normalized to the window, (0, 0) top-left.
    Cursor { x: f32, y: f32 },
    CursorLeft,
    /// Scroll lines; positive spreads the fingers.
    Spread(f32),
    Pinch(bool),
    ToggleLowConfidence,
}

/// Latest simulated hand pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimPose {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    pub gap: f32,
    pub pinched: bool,
    pub low_confidence: bool,
}

impl Default for SimPose {
    fn default() -> Self {
        Self {
            visible: false,
            x: 0.5,
            y: 0.5,
            gap: START_GAP,
            pinched: false,
            low_confidence: false,
        }
    }
}

impl SimPose {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Cursor { x, y } => {
                self.visible = (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y);
                self.x = x;
                self.y = y;
            }
            SimInput::CursorLeft => self.visible = false,
            SimInput::Spread(lines) => {
                self.gap = (self.gap + lines * GAP_STEP).clamp(0.0, MAX_GAP);
            }
            SimInput::Pinch(held) => self.pinched = held,
            SimInput::ToggleLowConfidence => {
                self.low_confidence = !self.low_confidence;
                log::info!(
                    "Simulated hand confidence: {}",
                    if self.low_confidence { "low" } else { "clear" }
                );
            }
        }
    }

    /// Thumb-index gap as the tracker will see it.
    pub fn finger_gap(&self) -> f32 {
        if self.pinched {
            PINCHED_GAP
        } else {
            self.gap
        }
    }

    pub fn score(&self) -> f32 {
        if self.low_confidence {
            LOW_SCORE
        } else {
            CLEAR_SCORE
        }
    }
}

/// Applies the detection/tracking thresholds the way landmark models do: a
/// new hand must clear the detection threshold, a hand already being
/// tracked only the tracking threshold.
#[derive(Debug, Clone)]
pub struct SimDetector {
    options: TrackerOptions,
    tracking: bool,
}

impl SimDetector {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            tracking: false,
        }
    }

    pub fn detect(&mut self, pose: &SimPose, frame: u64) -> HandResults {
        let threshold = if self.tracking {
            self.options.min_tracking_confidence
        } else {
            self.options.min_detection_confidence
        };
        self.tracking = pose.visible && pose.score() >= threshold;

        if !self.tracking {
            return HandResults::empty(frame);
        }

        let mut hands = vec![synthetic_hand(pose.x, pose.y, pose.finger_gap())];
        hands.truncate(self.options.max_num_hands);
        HandResults { frame, hands }
    }
}

/// Builds an upright open hand with its wrist at (`wrist_x`, `wrist_y`) and
/// thumb and index tips `gap` apart, side by side.
pub fn synthetic_hand(wrist_x: f32, wrist_y: f32, gap: f32) -> Hand {
    let wrist = Landmark::new(wrist_x, wrist_y, 0.0);
    let tips_y = wrist_y - HAND_LENGTH;
    let thumb_tip = Landmark::new(wrist_x - gap * 0.5, tips_y, -0.02);
    let index_tip = Landmark::new(wrist_x + gap * 0.5, tips_y, -0.02);

    let mut lm = [wrist; HAND_LANDMARK_COUNT];

    // Thumb runs straight from the wrist.
    fill_chain(&mut lm, THUMB_CMC, 4, &wrist, &thumb_tip);

    for (k, &base) in FINGER_BASES[1..].iter().enumerate() {
        let k = k as f32;
        let mcp = Landmark::new(wrist_x + 0.02 + 0.025 * k, wrist_y - PALM_LENGTH, 0.0);
        let tip = if base == INDEX_MCP {
            index_tip
        } else {
            Landmark::new(mcp.x, tips_y + 0.015 * k, -0.01)
        };
        lm[base] = mcp;
        fill_chain(&mut lm, base + 1, 3, &mcp, &tip);
    }

    // Tips exactly, so the pinch distance equals `gap`.
    lm[THUMB_TIP] = thumb_tip;
    lm[INDEX_TIP] = index_tip;
    Hand::new(lm)
}

/// Places `count` joints evenly from `from` (exclusive) to `to` (inclusive).
fn fill_chain(
    lm: &mut [Landmark; HAND_LANDMARK_COUNT],
    start: usize,
    count: usize,
    from: &Landmark,
    to: &Landmark,
) {
    for i in 0..count {
        let t = (i + 1) as f32 / count as f32;
        lm[start + i] = Landmark::new(
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
            from.z + (to.z - from.z) * t,
        );
    }
}

/// Tracker fed from the viewer window's input events.
pub struct SimulatedHands {
    rx: Receiver<SimInput>,
    detector: SimDetector,
    feed: VideoFeedConfig,
}

impl SimulatedHands {
    pub fn new(rx: Receiver<SimInput>, options: TrackerOptions, feed: VideoFeedConfig) -> Self {
        Self {
            rx,
            detector: SimDetector::new(options),
            feed,
        }
    }
}

impl HandTracker for SimulatedHands {
    fn run(mut self: Box<Self>, tx: Sender<HandResults>) {
        let interval = self.feed.frame_interval();
        let mut pose = SimPose::default();
        let mut frame: u64 = 0;

        log::info!(
            "Simulated hand tracker running: {}x{} @ {} fps",
            self.feed.width,
            self.feed.height,
            self.feed.fps
        );

        loop {
            // Collect input until the next video frame is due.
            let due = Instant::now() + interval;
            loop {
                let wait = due.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(wait) {
                    Ok(input) => pose.apply(input),
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => {
                        log::debug!("Input channel closed; stopping simulated tracker");
                        return;
                    }
                }
            }

            frame += 1;
            let results = self.detector.detect(&pose, frame);
            if tx.send(results).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handcloud::{extract, landmarks::WRIST};
    use std::sync::mpsc;
    use std::time::Duration;

    fn visible_pose() -> SimPose {
        let mut pose = SimPose::default();
        pose.apply(SimInput::Cursor { x: 0.4, y: 0.6 });
        pose
    }

    #[test]
    fn synthetic_hand_has_requested_pinch_and_height() {
        let hand = synthetic_hand(0.5, 0.4, 0.25);
        let signal = extract(std::slice::from_ref(&hand)).unwrap();
        assert!((signal.pinch_distance - 0.25).abs() < 1e-6);
        assert!((signal.hand_height - 0.4).abs() < 1e-6);
        assert_eq!(hand.landmark(WRIST), Some(&Landmark::new(0.5, 0.4, 0.0)));
        // Fingertips sit above the wrist in image space.
        assert!(hand.landmarks()[12].y < hand.wrist().y);
    }

    #[test]
    fn hidden_hand_yields_empty_results() {
        let mut detector = SimDetector::new(TrackerOptions::default());
        let results = detector.detect(&SimPose::default(), 3);
        assert!(results.is_empty());
        assert_eq!(results.frame, 3);

        let mut pose = visible_pose();
        pose.apply(SimInput::CursorLeft);
        assert!(detector.detect(&pose, 4).is_empty());
    }

    #[test]
    fn cursor_outside_window_hides_hand() {
        let mut pose = visible_pose();
        pose.apply(SimInput::Cursor { x: 1.2, y: 0.5 });
        assert!(!pose.visible);
    }

    #[test]
    fn visible_hand_is_reported() {
        let mut detector = SimDetector::new(TrackerOptions::default());
        let results = detector.detect(&visible_pose(), 1);
        assert_eq!(results.hands.len(), 1);
        let signal = extract(&results.hands).unwrap();
        assert!((signal.hand_height - 0.6).abs() < 1e-6);
    }

    #[test]
    fn low_confidence_hand_is_filtered() {
        let mut detector = SimDetector::new(TrackerOptions::default());
        let mut pose = visible_pose();
        pose.apply(SimInput::ToggleLowConfidence);
        assert!(detector.detect(&pose, 1).is_empty());
    }

    #[test]
    fn tracked_hand_uses_the_tracking_threshold() {
        let mut detector = SimDetector::new(TrackerOptions {
            max_num_hands: 1,
            min_detection_confidence: 0.9,
            min_tracking_confidence: 0.4,
        });
        let mut pose = visible_pose();
        pose.apply(SimInput::ToggleLowConfidence);
        // Too weak to be picked up...
        assert!(detector.detect(&pose, 1).is_empty());

        pose.apply(SimInput::ToggleLowConfidence);
        assert!(!detector.detect(&pose, 2).is_empty());
        // ...but strong enough to keep once tracked.
        pose.apply(SimInput::ToggleLowConfidence);
        assert!(!detector.detect(&pose, 3).is_empty());
    }

    #[test]
    fn scroll_and_pinch_set_the_gap() {
        let mut pose = visible_pose();
        pose.apply(SimInput::Spread(5.0));
        assert!((pose.finger_gap() - 0.35).abs() < 1e-6);
        pose.apply(SimInput::Spread(-100.0));
        assert_eq!(pose.finger_gap(), 0.0);
        pose.apply(SimInput::Pinch(true));
        assert_eq!(pose.finger_gap(), PINCHED_GAP);
        pose.apply(SimInput::Pinch(false));
        assert_eq!(pose.finger_gap(), 0.0);
    }

    #[test]
    fn tracker_thread_emits_results_and_stops_on_hangup() {
        let (input_tx, input_rx) = mpsc::channel();
        let tracker = SimulatedHands::new(
            input_rx,
            TrackerOptions::default(),
            VideoFeedConfig {
                fps: 200,
                ..VideoFeedConfig::default()
            },
        );
        let results = super::super::spawn_tracker(tracker);

        input_tx.send(SimInput::Cursor { x: 0.5, y: 0.3 }).unwrap();
        let found = (0..200)
            .filter_map(|_| results.recv_timeout(Duration::from_secs(1)).ok())
            .find(|r| !r.is_empty())
            .expect("simulated hand never reported");
        assert!(found.frame >= 1);

        drop(input_tx);
        // Drain until the tracker notices the hangup and closes its end.
        while results.recv_timeout(Duration::from_secs(2)).is_ok() {}
    }
}
