use crate::tracking::{TrackerOptions, VideoFeedConfig};
use clap::Parser;
use handcloud::params::{
    CloudParams, GestureParams, DEFAULT_HALF_WIDTH, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE,
    DEFAULT_NEUTRAL_PINCH, DEFAULT_POINT_COUNT, DEFAULT_POINT_SIZE, DEFAULT_ROTATION_STEP,
    DEFAULT_SENSITIVITY, DEFAULT_SMOOTHING,
};

/// `particle_viewer` - a point cloud that follows your hand.
///
/// Pinch thumb and index together to grow the cloud, spread them to shrink
/// it; raise or lower the hand to shift its color. Without a camera tracker
/// the hand is simulated from the mouse: the cursor is the wrist, the scroll
/// wheel sets the finger gap and Space pinches.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Number of points in the cloud.
    #[arg(long, env = "CLOUD_POINT_COUNT", default_value_t = DEFAULT_POINT_COUNT)]
    pub count: usize,

    /// Half width of the cube the points are scattered in.
    #[arg(long, env = "CLOUD_HALF_WIDTH", default_value_t = DEFAULT_HALF_WIDTH)]
    pub half_width: f32,

    /// Point sprite size in world units.
    #[arg(long, env = "CLOUD_POINT_SIZE", default_value_t = DEFAULT_POINT_SIZE)]
    pub point_size: f32,

    /// Seed for point placement. A random seed is drawn when omitted.
    #[arg(long, env = "CLOUD_SEED")]
    pub seed: Option<u64>,

    /// Pinch distance (normalized) that leaves the cloud at scale 1.
    #[arg(long, default_value_t = DEFAULT_NEUTRAL_PINCH)]
    pub neutral_pinch: f32,

    /// Scale change per unit of pinch distance.
    #[arg(long, default_value_t = DEFAULT_SENSITIVITY)]
    pub sensitivity: f32,

    #[arg(long, default_value_t = DEFAULT_MIN_SCALE)]
    pub min_scale: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_SCALE)]
    pub max_scale: f32,

    /// Fraction of the remaining scale error closed per frame.
    #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
    pub smoothing: f32,

    /// Rotation about the vertical axis per frame while tracking (radians).
    #[arg(long, default_value_t = DEFAULT_ROTATION_STEP)]
    pub rotation_step: f32,

    /// Capture width requested from the video feed.
    #[arg(long, env = "CAPTURE_WIDTH", default_value_t = 640)]
    pub capture_width: u32,

    /// Capture height requested from the video feed.
    #[arg(long, env = "CAPTURE_HEIGHT", default_value_t = 480)]
    pub capture_height: u32,

    /// Video frames processed by the tracker per second.
    #[arg(long, env = "TRACKING_FPS", default_value_t = 30)]
    pub tracking_fps: u32,

    /// Maximum number of hands the tracker reports.
    #[arg(long, default_value_t = 1)]
    pub max_hands: usize,

    #[arg(long, default_value_t = 0.7)]
    pub min_detection_confidence: f32,

    #[arg(long, default_value_t = 0.7)]
    pub min_tracking_confidence: f32,

    /// Present frames as fast as possible instead of waiting for v-sync.
    #[arg(long)]
    pub no_vsync: bool,
}

impl Config {
    pub fn cloud_params(&self) -> CloudParams {
        CloudParams {
            count: self.count,
            half_width: self.half_width,
            point_size: self.point_size,
        }
    }

    pub fn gesture_params(&self) -> GestureParams {
        GestureParams {
            neutral_pinch: self.neutral_pinch,
            sensitivity: self.sensitivity,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            smoothing: self.smoothing,
            rotation_step: self.rotation_step,
        }
    }

    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            max_num_hands: self.max_hands,
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
        }
    }

    pub fn video_feed(&self) -> VideoFeedConfig {
        VideoFeedConfig {
            width: self.capture_width,
            height: self.capture_height,
            fps: self.tracking_fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_tunables() {
        let config = Config::try_parse_from(["particle_viewer"]).unwrap();
        assert_eq!(config.gesture_params(), GestureParams::default());
        assert_eq!(config.cloud_params().count, DEFAULT_POINT_COUNT);
        assert_eq!(config.tracker_options(), TrackerOptions::default());
        assert_eq!(config.video_feed(), VideoFeedConfig::default());
        assert!(!config.no_vsync);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "particle_viewer",
            "--count",
            "500",
            "--seed",
            "9",
            "--min-scale",
            "0.5",
            "--min-detection-confidence",
            "0.9",
            "--no-vsync",
        ])
        .unwrap();
        assert_eq!(config.cloud_params().count, 500);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.gesture_params().min_scale, 0.5);
        assert_eq!(config.tracker_options().min_detection_confidence, 0.9);
        assert!(config.no_vsync);
    }
}
