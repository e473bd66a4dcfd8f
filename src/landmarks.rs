// Hand landmarks as the detector reports them: 21 named keypoints in pixel space.
// A HandFrame can only exist with all 21 points in detector order, so code that
// receives one never has to re-check the count.

use std::ops::Index;

use crate::error::{Error, Result};

/// Number of keypoints the detector yields for one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Named keypoints, numbered per the detector convention (0 = wrist, 4 = thumb tip, 8 = index tip, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Landmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl Landmark {
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::PinkyMcp,
        Self::PinkyPip,
        Self::PinkyDip,
        Self::PinkyTip,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The keypoint `steps` positions further down the same kinematic chain
    /// (towards the wrist). Saturates at the wrist.
    pub fn below(self, steps: usize) -> Landmark {
        Self::ALL[self.index().saturating_sub(steps)]
    }
}

/// Skeleton bones (parent, child) used by the overlay.
pub const BONES: [(Landmark, Landmark); 21] = [
    (Landmark::Wrist, Landmark::ThumbCmc),
    (Landmark::ThumbCmc, Landmark::ThumbMcp),
    (Landmark::ThumbMcp, Landmark::ThumbIp),
    (Landmark::ThumbIp, Landmark::ThumbTip),
    (Landmark::Wrist, Landmark::IndexMcp),
    (Landmark::IndexMcp, Landmark::IndexPip),
    (Landmark::IndexPip, Landmark::IndexDip),
    (Landmark::IndexDip, Landmark::IndexTip),
    (Landmark::IndexMcp, Landmark::MiddleMcp),
    (Landmark::MiddleMcp, Landmark::MiddlePip),
    (Landmark::MiddlePip, Landmark::MiddleDip),
    (Landmark::MiddleDip, Landmark::MiddleTip),
    (Landmark::MiddleMcp, Landmark::RingMcp),
    (Landmark::RingMcp, Landmark::RingPip),
    (Landmark::RingPip, Landmark::RingDip),
    (Landmark::RingDip, Landmark::RingTip),
    (Landmark::RingMcp, Landmark::PinkyMcp),
    (Landmark::Wrist, Landmark::PinkyMcp),
    (Landmark::PinkyMcp, Landmark::PinkyPip),
    (Landmark::PinkyPip, Landmark::PinkyDip),
    (Landmark::PinkyDip, Landmark::PinkyTip),
];

/// One keypoint in camera pixel coordinates (origin top-left, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LandmarkPoint {
    pub id: u8,
    pub x: i32,
    pub y: i32,
}

/// All 21 keypoints of the single tracked hand for one camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandFrame {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandFrame {
    /// Build from detector output. Rejects anything that is not exactly 21
    /// points with ids 0..=20 in order.
    pub fn from_points(points: Vec<LandmarkPoint>) -> Result<Self> {
        let points: [LandmarkPoint; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|v: Vec<LandmarkPoint>| Error::MalformedHand(format!("got {}", v.len())))?;

        if let Some((pos, p)) = points.iter().enumerate().find(|(i, p)| p.id as usize != *i) {
            return Err(Error::MalformedHand(format!(
                "id {} found at position {pos}",
                p.id
            )));
        }
        Ok(Self { points })
    }

    /// Convenience for tests that only have coordinates; ids follow the position.
    #[cfg(test)]
    pub fn from_xy(coords: [(i32, i32); LANDMARK_COUNT]) -> Self {
        let mut points = [LandmarkPoint::default(); LANDMARK_COUNT];
        for (i, (x, y)) in coords.into_iter().enumerate() {
            points[i] = LandmarkPoint { id: i as u8, x, y };
        }
        Self { points }
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }
}

impl Index<Landmark> for HandFrame {
    type Output = LandmarkPoint;

    fn index(&self, landmark: Landmark) -> &LandmarkPoint {
        &self.points[landmark.index()]
    }
}
