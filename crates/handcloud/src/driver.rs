//! Frame driver: the state shared by the tracking callback and the render
//! step.
//!
//! Two independently clocked entry points feed one state machine:
//!
//! - [`FrameDriver::on_results`] runs once per processed video frame. It is
//!   the only writer of the detection flag, the gesture signal, the scale
//!   target and the color buffer.
//! - [`FrameDriver::on_frame`] runs once per display refresh. It is the only
//!   writer of the transform, and only advances it while a hand is detected.
//!
//! Both are called from the same thread, so a callback's writes are always
//! visible to the next render step. Every value is last-write-wins; nothing is
//! queued or accumulated between calls.

use crate::{
    cloud::PointCloud,
    gesture::{self, GestureSignal},
    landmarks::HandResults,
    params::GestureParams,
    scale::ScaleController,
};
use glam::{Mat4, Vec3};

/// Which branch the render step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A hand was present in the latest result: scale and rotation advance.
    Tracking,
    /// No hand: the transform is held at its last value.
    Idle,
}

/// Uniform scale and rotation about +Y applied to the whole cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub rotation_y: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation_y: 0.0,
    };

    /// Object-to-world matrix, rotation applied after scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What the renderer needs from one render step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub phase: Phase,
    pub transform: Transform,
}

/// Values written by the tracking callback and read by the render step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackingState {
    pub hand_detected: bool,
    /// Signal from the latest result; `None` after a result without a hand.
    pub signal: Option<GestureSignal>,
    /// Video frame of the latest result.
    pub frame: Option<u64>,
}

pub struct FrameDriver {
    cloud: PointCloud,
    scale: ScaleController,
    transform: Transform,
    rotation_step: f32,
    tracking: TrackingState,
    frames: u64,
}

impl FrameDriver {
    pub fn new(cloud: PointCloud, params: GestureParams) -> Self {
        Self {
            cloud,
            scale: ScaleController::new(params),
            transform: Transform::IDENTITY,
            rotation_step: params.rotation_step,
            tracking: TrackingState::default(),
            frames: 0,
        }
    }

    /// Tracking callback. An empty result is the normal "no hand" case and
    /// only clears the detection flag.
    pub fn on_results(&mut self, results: &HandResults) {
        let was_detected = self.tracking.hand_detected;
        self.tracking.frame = Some(results.frame);

        let Some(signal) = gesture::extract(&results.hands) else {
            if was_detected {
                log::debug!("Hand lost at video frame {}; holding transform", results.frame);
            }
            self.tracking.hand_detected = false;
            self.tracking.signal = None;
            return;
        };

        if !was_detected {
            log::debug!("Hand acquired at video frame {}", results.frame);
        }

        let target = self.scale.set_target(signal.pinch_distance);
        self.cloud.apply_color(signal.hand_height);
        self.tracking.hand_detected = true;
        self.tracking.signal = Some(signal);

        log::trace!(
            "frame={} pinch={:.3} height={:.3} target_scale={:.3}",
            results.frame,
            signal.pinch_distance,
            signal.hand_height,
            target
        );
    }

    /// Render step. The caller draws with the returned state in both phases.
    pub fn on_frame(&mut self) -> FrameState {
        self.frames += 1;

        let phase = if self.tracking.hand_detected {
            self.transform.scale = self.scale.step();
            self.transform.rotation_y += self.rotation_step;
            Phase::Tracking
        } else {
            Phase::Idle
        };

        FrameState {
            phase,
            transform: self.transform,
        }
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Mutable access for the renderer to consume the color dirty flag.
    #[inline]
    pub fn cloud_mut(&mut self) -> &mut PointCloud {
        &mut self.cloud
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    pub fn target_scale(&self) -> f32 {
        self.scale.target()
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking.hand_detected
    }

    #[inline]
    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    #[inline]
    pub fn last_signal(&self) -> Option<GestureSignal> {
        self.tracking.signal
    }

    /// Number of render steps taken so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Hand, Landmark, HAND_LANDMARK_COUNT, INDEX_TIP, THUMB_TIP, WRIST};
    use rand::{rngs::StdRng, SeedableRng};

    fn driver(count: usize) -> FrameDriver {
        let mut rng = StdRng::seed_from_u64(42);
        FrameDriver::new(
            PointCloud::generate(count, 75.0, &mut rng),
            GestureParams::default(),
        )
    }

    fn results(frame: u64, thumb: (f32, f32), index: (f32, f32), wrist_y: f32) -> HandResults {
        let mut lm = [Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        lm[WRIST] = Landmark::new(0.5, wrist_y, 0.0);
        lm[THUMB_TIP] = Landmark::new(thumb.0, thumb.1, 0.0);
        lm[INDEX_TIP] = Landmark::new(index.0, index.1, 0.0);
        HandResults {
            frame,
            hands: vec![Hand::new(lm)],
        }
    }

    #[test]
    fn starts_idle_at_identity() {
        let mut d = driver(10);
        assert!(!d.is_tracking());
        let state = d.on_frame();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.transform, Transform::IDENTITY);
        assert_eq!(d.frames(), 1);
    }

    #[test]
    fn neutral_pinch_rotates_without_scaling() {
        let mut d = driver(3000);
        d.on_results(&results(1, (0.50, 0.50), (0.50, 0.75), 0.4));

        assert!(d.is_tracking());
        assert_eq!(d.target_scale(), 1.0);
        assert!(d.cloud().colors_dirty());
        for i in 0..d.cloud().len() {
            let [r, g, b] = d.cloud().color(i).unwrap();
            assert!((r - 0.4).abs() < 1e-6);
            assert!((g - 0.6).abs() < 1e-6);
            assert_eq!(b, 1.0);
        }

        let state = d.on_frame();
        assert_eq!(state.phase, Phase::Tracking);
        assert_eq!(state.transform.scale, 1.0);
        assert!((state.transform.rotation_y - 0.002).abs() < 1e-7);
    }

    #[test]
    fn no_hand_freezes_transform() {
        let mut d = driver(100);
        d.on_results(&results(1, (0.5, 0.5), (0.5, 0.5), 0.2));
        for _ in 0..5 {
            d.on_frame();
        }
        let held = d.transform();
        assert!(held.scale > 1.0);

        d.on_results(&HandResults::empty(2));
        assert!(!d.is_tracking());
        assert_eq!(d.last_signal(), None);
        for _ in 0..100 {
            let state = d.on_frame();
            assert_eq!(state.phase, Phase::Idle);
            assert_eq!(state.transform, held);
        }

        d.on_results(&results(3, (0.5, 0.5), (0.5, 0.5), 0.2));
        let resumed = d.on_frame();
        assert_eq!(resumed.phase, Phase::Tracking);
        assert!(resumed.transform.rotation_y > held.rotation_y);
    }

    #[test]
    fn no_hand_leaves_colors_and_target_alone() {
        let mut d = driver(50);
        d.on_results(&results(1, (0.1, 0.1), (0.9, 0.9), 0.7));
        let target = d.target_scale();
        let colors = d.cloud().colors().to_vec();
        d.cloud_mut().take_colors_dirty();

        d.on_results(&HandResults::empty(2));
        assert_eq!(d.target_scale(), target);
        assert_eq!(d.cloud().colors(), &colors[..]);
        assert!(!d.cloud().colors_dirty());
        assert_eq!(d.tracking().frame, Some(2));
    }

    #[test]
    fn scale_keeps_easing_between_results() {
        let mut d = driver(10);
        d.on_results(&results(1, (0.5, 0.5), (0.5, 0.5), 0.5));
        assert_eq!(d.target_scale(), 2.0);

        let mut prev = d.transform().scale;
        for _ in 0..30 {
            let scale = d.on_frame().transform.scale;
            assert!(scale > prev && scale <= 2.0);
            prev = scale;
        }
    }

    #[test]
    fn latest_result_wins() {
        let mut d = driver(10);
        d.on_results(&results(1, (0.5, 0.5), (0.5, 0.5), 0.1));
        d.on_results(&results(2, (0.0, 0.0), (3.0, 4.0), 0.9));
        assert_eq!(d.target_scale(), 0.6);
        let signal = d.last_signal().unwrap();
        assert!((signal.hand_height - 0.9).abs() < 1e-6);
        assert!((signal.pinch_distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn model_matrix_scales_then_rotates() {
        let t = Transform {
            scale: 2.0,
            rotation_y: std::f32::consts::FRAC_PI_2,
        };
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }
}
