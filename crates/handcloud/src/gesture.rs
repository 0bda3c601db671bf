//! Reduces a tracking result to the two scalars that drive the cloud.

use crate::landmarks::Hand;

/// Per-callback control signal. Not kept between callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    /// Thumb tip to index tip, image plane only. Never negative.
    pub pinch_distance: f32,
    /// Wrist y; 0 at the top of the frame, 1 at the bottom.
    pub hand_height: f32,
}

impl GestureSignal {
    pub fn from_hand(hand: &Hand) -> Self {
        Self {
            pinch_distance: hand.thumb_tip().planar_distance(hand.index_tip()),
            hand_height: hand.wrist().y,
        }
    }
}

/// Returns `None` when no hand was detected. Only the first hand counts.
pub fn extract(hands: &[Hand]) -> Option<GestureSignal> {
    hands.first().map(GestureSignal::from_hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, HAND_LANDMARK_COUNT, INDEX_TIP, THUMB_TIP, WRIST};

    fn hand(thumb: (f32, f32), index: (f32, f32), wrist_y: f32) -> Hand {
        let mut lm = [Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        lm[WRIST] = Landmark::new(0.5, wrist_y, 0.0);
        lm[THUMB_TIP] = Landmark::new(thumb.0, thumb.1, -0.05);
        lm[INDEX_TIP] = Landmark::new(index.0, index.1, 0.07);
        Hand::new(lm)
    }

    #[test]
    fn empty_results_mean_no_hand() {
        assert_eq!(extract(&[]), None);
    }

    #[test]
    fn pinch_is_planar_thumb_index_distance() {
        let signal = extract(&[hand((0.50, 0.50), (0.50, 0.75), 0.4)]).unwrap();
        assert!((signal.pinch_distance - 0.25).abs() < 1e-6);
        assert!((signal.hand_height - 0.4).abs() < 1e-6);
    }

    #[test]
    fn touching_fingers_give_zero_pinch() {
        let signal = extract(&[hand((0.3, 0.3), (0.3, 0.3), 0.9)]).unwrap();
        assert_eq!(signal.pinch_distance, 0.0);
    }

    #[test]
    fn pinch_is_never_negative() {
        for (t, i) in [((0.9, 0.1), (0.1, 0.9)), ((0.0, 0.0), (1.0, 1.0)), ((0.2, 0.6), (0.2, 0.1))] {
            assert!(extract(&[hand(t, i, 0.5)]).unwrap().pinch_distance >= 0.0);
        }
    }

    #[test]
    fn only_first_hand_is_used() {
        let first = hand((0.1, 0.1), (0.2, 0.1), 0.2);
        let second = hand((0.1, 0.1), (0.9, 0.9), 0.8);
        let signal = extract(&[first, second]).unwrap();
        assert!((signal.pinch_distance - 0.1).abs() < 1e-6);
        assert!((signal.hand_height - 0.2).abs() < 1e-6);
    }
}
