//! Tunable constants for cloud generation and gesture response.

use thiserror::Error;

/// Number of points in the cloud.
pub const DEFAULT_POINT_COUNT: usize = 3000;
/// Half width of the cube the points are scattered in (world units).
pub const DEFAULT_HALF_WIDTH: f32 = 75.0;
/// Point sprite size in world units (attenuated by distance).
pub const DEFAULT_POINT_SIZE: f32 = 1.8;

/// Pinch distance (normalized image units) that maps to scale 1.
pub const DEFAULT_NEUTRAL_PINCH: f32 = 0.25;
/// Scale change per unit of pinch distance.
pub const DEFAULT_SENSITIVITY: f32 = 5.0;
pub const DEFAULT_MIN_SCALE: f32 = 0.6;
pub const DEFAULT_MAX_SCALE: f32 = 2.0;
/// Fraction of the remaining scale error closed per render frame.
pub const DEFAULT_SMOOTHING: f32 = 0.1;
/// Rotation about Y per render frame while tracking (radians).
pub const DEFAULT_ROTATION_STEP: f32 = 0.002;

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("point count must be non-zero")]
    EmptyCloud,
    #[error("cube half width must be finite and non-negative, got {0}")]
    BadHalfWidth(f32),
    #[error("point size must be finite and positive, got {0}")]
    BadPointSize(f32),
    #[error("scale clamp range is inverted: min {min} > max {max}")]
    InvertedScaleRange { min: f32, max: f32 },
    #[error("smoothing factor must lie in (0, 1], got {0}")]
    BadSmoothing(f32),
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
}

/// Shape of the generated cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    pub count: usize,
    pub half_width: f32,
    pub point_size: f32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_POINT_COUNT,
            half_width: DEFAULT_HALF_WIDTH,
            point_size: DEFAULT_POINT_SIZE,
        }
    }
}

impl CloudParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.count == 0 {
            return Err(ParamsError::EmptyCloud);
        }
        if !self.half_width.is_finite() || self.half_width < 0.0 {
            return Err(ParamsError::BadHalfWidth(self.half_width));
        }
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(ParamsError::BadPointSize(self.point_size));
        }
        Ok(())
    }
}

/// How pinch and hand height drive the cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureParams {
    pub neutral_pinch: f32,
    pub sensitivity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub smoothing: f32,
    pub rotation_step: f32,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            neutral_pinch: DEFAULT_NEUTRAL_PINCH,
            sensitivity: DEFAULT_SENSITIVITY,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            smoothing: DEFAULT_SMOOTHING,
            rotation_step: DEFAULT_ROTATION_STEP,
        }
    }
}

impl GestureParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("neutral_pinch", self.neutral_pinch),
            ("sensitivity", self.sensitivity),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("rotation_step", self.rotation_step),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
        }
        // f32::clamp panics on an inverted range.
        if self.min_scale > self.max_scale {
            return Err(ParamsError::InvertedScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ParamsError::BadSmoothing(self.smoothing));
        }
        Ok(())
    }
}
