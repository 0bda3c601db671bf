//! Pinch-to-scale mapping and per-frame easing.

use crate::params::GestureParams;

/// Linear interpolation from `current` toward `target` by fraction `t`.
///
/// Applied once per frame with a fixed `t` this is an exponential smoother,
/// not a spring: the remaining error shrinks by `(1 - t)` each call.
#[inline]
pub fn advance(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}

/// Tracks the cloud's current uniform scale and the target it eases toward.
#[derive(Debug, Clone)]
pub struct ScaleController {
    current: f32,
    target: f32,
    params: GestureParams,
}

impl ScaleController {
    pub fn new(params: GestureParams) -> Self {
        Self {
            current: 1.0,
            target: 1.0,
            params,
        }
    }

    /// Closer fingers give a larger cloud; `neutral_pinch` maps to 1.
    pub fn target_for_pinch(&self, pinch_distance: f32) -> f32 {
        let p = &self.params;
        (1.0 + (p.neutral_pinch - pinch_distance) * p.sensitivity).clamp(p.min_scale, p.max_scale)
    }

    /// Stores the target for `pinch_distance` and returns it. A NaN pinch
    /// leaves the previous target in place.
    pub fn set_target(&mut self, pinch_distance: f32) -> f32 {
        let target = self.target_for_pinch(pinch_distance);
        if target.is_nan() {
            log::warn!("Ignoring non-numeric pinch distance; keeping target {:.3}", self.target);
            return self.target;
        }
        self.target = target;
        self.target
    }

    /// Eases the current scale one frame toward the target.
    pub fn step(&mut self) -> f32 {
        self.current = advance(self.current, self.target, self.params.smoothing);
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn params(&self) -> &GestureParams {
        &self.params
    }
}

impl Default for ScaleController {
    fn default() -> Self {
        Self::new(GestureParams::default())
    }
}
