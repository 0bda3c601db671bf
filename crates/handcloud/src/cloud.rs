//! The particle cloud: positions fixed at generation, one shared color.

use crate::params::CloudParams;
use rand::Rng;
use rayon::prelude::*;

/// Color written to every point for a given hand height.
///
/// Height 0 (top of frame) gives cyan, height 1 gives magenta. The
/// input is not clamped; normalized landmarks keep it in [0, 1].
#[inline]
pub fn color_for_height(hand_height: f32) -> [f32; 3] {
    [hand_height, 1.0 - hand_height, 1.0]
}

/// Interleaved xyz positions and rgb colors, `3 * len` floats each.
#[derive(Debug, Clone)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
    colors_dirty: bool,
}

impl PointCloud {
    /// Scatters `count` white points uniformly in `[-half_width, half_width]^3`.
    pub fn generate<R: Rng + ?Sized>(count: usize, half_width: f32, rng: &mut R) -> Self {
        let positions: Vec<f32> = (0..count * 3)
            .map(|_| (rng.gen::<f32>() - 0.5) * 2.0 * half_width)
            .collect();
        let colors = vec![1.0; count * 3];

        log::debug!(
            "Generated point cloud: points={}, half_width={:.1}",
            count,
            half_width
        );

        Self {
            positions,
            colors,
            colors_dirty: false,
        }
    }

    pub fn from_params<R: Rng + ?Sized>(params: &CloudParams, rng: &mut R) -> Self {
        Self::generate(params.count, params.half_width, rng)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn point(&self, index: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }

    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        let c = self.colors.get(index * 3..index * 3 + 3)?;
        Some([c[0], c[1], c[2]])
    }

    /// Writes the height color into every point and marks the buffer for
    /// re-upload.
    pub fn apply_color(&mut self, hand_height: f32) {
        let rgb = color_for_height(hand_height);
        self.colors
            .par_chunks_exact_mut(3)
            .for_each(|c| c.copy_from_slice(&rgb));
        self.colors_dirty = true;
    }

    #[inline]
    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Returns whether colors changed since the last call, and clears the flag.
    #[inline]
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::take(&mut self.colors_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn cloud(count: usize, half_width: f32) -> PointCloud {
        let mut rng = StdRng::seed_from_u64(7);
        PointCloud::generate(count, half_width, &mut rng)
    }

    #[test]
    fn buffers_hold_three_floats_per_point() {
        for n in [0, 1, 17, 3000] {
            let c = cloud(n, 75.0);
            assert_eq!(c.len(), n);
            assert_eq!(c.positions().len(), 3 * n);
            assert_eq!(c.colors().len(), 3 * n);
        }
    }

    #[test]
    fn positions_stay_inside_the_cube() {
        let c = cloud(3000, 75.0);
        assert!(c.positions().iter().all(|v| (-75.0..=75.0).contains(v)));
        // 9000 samples land close to both faces.
        let max = c.positions().iter().cloned().fold(f32::MIN, f32::max);
        let min = c.positions().iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > 60.0 && min < -60.0);
    }

    #[test]
    fn starts_white_and_clean() {
        let c = cloud(100, 10.0);
        assert!(c.colors().iter().all(|&v| v == 1.0));
        assert!(!c.colors_dirty());
    }

    #[test]
    fn apply_color_is_uniform() {
        let mut c = cloud(3000, 75.0);
        let before = c.positions().to_vec();
        c.apply_color(0.3);
        for i in 0..c.len() {
            let [r, g, b] = c.color(i).unwrap();
            assert!((r - 0.3).abs() < 1e-6);
            assert!((g - 0.7).abs() < 1e-6);
            assert_eq!(b, 1.0);
        }
        assert_eq!(c.positions(), &before[..]);
    }

    #[test]
    fn dirty_flag_is_taken_once() {
        let mut c = cloud(10, 1.0);
        c.apply_color(0.5);
        assert!(c.take_colors_dirty());
        assert!(!c.take_colors_dirty());
    }

    #[test]
    fn height_outside_unit_range_is_not_clamped() {
        assert_eq!(color_for_height(1.5), [1.5, -0.5, 1.0]);
    }

    #[test]
    fn same_seed_same_cloud() {
        assert_eq!(cloud(50, 5.0).positions(), cloud(50, 5.0).positions());
        assert!(cloud(5, 5.0).point(5).is_none());
    }
}
