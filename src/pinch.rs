// Thumb-tip to index-tip distance, shared by the click and drag rules.

use crate::landmarks::{HandFrame, Landmark, LandmarkPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    /// Euclidean distance in camera pixels, never negative.
    pub distance: f32,
    /// Halfway point between the two tips; only drawn by the overlay.
    pub midpoint: (i32, i32),
}

impl Pinch {
    pub fn measure(thumb: LandmarkPoint, index: LandmarkPoint) -> Self {
        let dx = (index.x - thumb.x) as f32;
        let dy = (index.y - thumb.y) as f32;
        Self {
            distance: dx.hypot(dy),
            midpoint: ((thumb.x + index.x) / 2, (thumb.y + index.y) / 2),
        }
    }

    pub fn of_hand(hand: &HandFrame) -> Self {
        Self::measure(hand[Landmark::ThumbTip], hand[Landmark::IndexTip])
    }

    /// Strictly below the threshold counts as pinching.
    #[inline]
    pub fn is_active(&self, threshold_px: f32) -> bool {
        self.distance < threshold_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(id: u8, x: i32, y: i32) -> LandmarkPoint {
        LandmarkPoint { id, x, y }
    }

    #[test]
    fn test_distance_is_euclidean() {
        let p = Pinch::measure(pt(4, 0, 0), pt(8, 30, 40));
        assert_eq!(p.distance, 50.0);
        assert_eq!(p.midpoint, (15, 20));
    }

    #[test]
    fn test_distance_symmetric_and_non_negative() {
        let a = Pinch::measure(pt(4, 100, 90), pt(8, 40, 10));
        let b = Pinch::measure(pt(4, 40, 10), pt(8, 100, 90));
        assert_eq!(a.distance, b.distance);
        assert!(a.distance >= 0.0);
        assert_eq!(Pinch::measure(pt(4, 7, 7), pt(8, 7, 7)).distance, 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let p = Pinch::measure(pt(4, 0, 0), pt(8, 40, 0));
        assert!(!p.is_active(40.0));
        assert!(p.is_active(40.5));
    }

    #[test]
    fn test_of_hand_uses_thumb_and_index_tips() {
        use crate::fingers::fixtures::{POINTING, hand, pinched};
        let h = pinched(&hand(POINTING), 10);
        assert_eq!(Pinch::of_hand(&h).distance, 10.0);
    }
}
