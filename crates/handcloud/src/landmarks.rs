//! Hand landmark data as delivered by a hand-tracking backend.
//!
//! Coordinates are normalized to the video frame: `x` and `y` in [0, 1] with
//! `y = 0` at the top edge, `z` a relative depth with the wrist as origin.

use thiserror::Error;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// First landmark of each finger chain, thumb to pinky. Each chain is four
/// consecutive indices ending at the fingertip.
pub const FINGER_BASES: [usize; 5] = [THUMB_CMC, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("hand has {got} landmarks, expected at least {HAND_LANDMARK_COUNT}")]
    TooFewLandmarks { got: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane; depth is ignored.
    #[inline]
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One tracked hand: exactly [`HAND_LANDMARK_COUNT`] landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Builds a hand from a backend's landmark list. Extra trailing
    /// landmarks are ignored.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self, LandmarkError> {
        let head = landmarks
            .get(..HAND_LANDMARK_COUNT)
            .ok_or(LandmarkError::TooFewLandmarks {
                got: landmarks.len(),
            })?;
        let mut out = [Landmark::default(); HAND_LANDMARK_COUNT];
        out.copy_from_slice(head);
        Ok(Self { landmarks: out })
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    #[inline]
    pub fn landmarks(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }

    #[inline]
    pub fn wrist(&self) -> &Landmark {
        &self.landmarks[WRIST]
    }

    #[inline]
    pub fn thumb_tip(&self) -> &Landmark {
        &self.landmarks[THUMB_TIP]
    }

    #[inline]
    pub fn index_tip(&self) -> &Landmark {
        &self.landmarks[INDEX_TIP]
    }
}

/// Payload of one tracking callback: the hands found in one video frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandResults {
    /// Sequence number of the video frame these results came from.
    pub frame: u64,
    pub hands: Vec<Hand>,
}

impl HandResults {
    pub fn empty(frame: u64) -> Self {
        Self {
            frame,
            hands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<Landmark> {
        (0..n)
            .map(|i| Landmark::new(i as f32 * 0.01, i as f32 * 0.02, 0.0))
            .collect()
    }

    #[test]
    fn from_slice_rejects_short_hands() {
        let err = Hand::from_slice(&ramp(20)).unwrap_err();
        assert_eq!(err, LandmarkError::TooFewLandmarks { got: 20 });
        assert!(Hand::from_slice(&[]).is_err());
    }

    #[test]
    fn from_slice_keeps_anatomical_order() {
        let hand = Hand::from_slice(&ramp(HAND_LANDMARK_COUNT + 3)).unwrap();
        assert_eq!(hand.wrist().x, 0.0);
        assert!((hand.thumb_tip().y - 0.08).abs() < 1e-6);
        assert!((hand.index_tip().x - 0.08).abs() < 1e-6);
        assert!(hand.landmark(HAND_LANDMARK_COUNT).is_none());
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 5.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn finger_chains_end_at_tips() {
        let tips: Vec<usize> = FINGER_BASES.iter().map(|b| b + 3).collect();
        assert_eq!(tips, vec![THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP]);
    }
}
