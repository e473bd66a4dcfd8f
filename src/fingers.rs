// Which fingers are extended, decided purely from one frame's landmark positions.
// Expects the mirrored camera view: the thumb points outward towards larger x.

use std::fmt;

use crate::landmarks::{HandFrame, Landmark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    pub fn tip(self) -> Landmark {
        match self {
            Self::Thumb => Landmark::ThumbTip,
            Self::Index => Landmark::IndexTip,
            Self::Middle => Landmark::MiddleTip,
            Self::Ring => Landmark::RingTip,
            Self::Pinky => Landmark::PinkyTip,
        }
    }
}

/// Up/down flag per finger, indexed Thumb..Pinky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    #[cfg(test)]
    pub const fn new(up: [bool; 5]) -> Self {
        Self(up)
    }

    #[inline]
    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }
}

impl fmt::Display for FingerStates {
    // Prints like [1,0,0,0,0]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, up) in self.as_array().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", u8::from(*up))?;
        }
        write!(f, "]")
    }
}

/// Thumb: tip x right of the joint below it. Other fingers: tip y above the
/// joint two below it (smaller y is higher in the image). No hysteresis.
pub fn classify(hand: &HandFrame) -> FingerStates {
    let mut up = [false; 5];
    for finger in Finger::ALL {
        let tip = hand[finger.tip()];
        up[finger as usize] = match finger {
            Finger::Thumb => tip.x > hand[finger.tip().below(1)].x,
            _ => tip.y < hand[finger.tip().below(2)].y,
        };
    }
    FingerStates(up)
}

/// Synthetic hands for tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::landmarks::{HandFrame, LANDMARK_COUNT, Landmark};

    const FINGER_BASE_X: [i32; 4] = [300, 320, 340, 360];

    /// A right hand in the mirrored view with the requested fingers extended.
    /// Index tip sits at (300, 200) when up.
    pub fn hand(up: [bool; 5]) -> HandFrame {
        let mut c = [(0, 0); LANDMARK_COUNT];
        c[Landmark::Wrist.index()] = (320, 400);

        // Thumb chain: CMC, MCP, IP, TIP
        c[1] = (340, 380);
        c[2] = (360, 360);
        if up[0] {
            c[3] = (380, 340);
            c[4] = (400, 330);
        } else {
            c[3] = (340, 330);
            c[4] = (320, 320);
        }

        // Index..Pinky chains: MCP, PIP, DIP, TIP
        for (f, x) in FINGER_BASE_X.iter().enumerate() {
            let base = 5 + f * 4;
            let ys = if up[f + 1] {
                [300, 260, 230, 200]
            } else {
                [300, 270, 290, 310]
            };
            for (j, y) in ys.iter().enumerate() {
                c[base + j] = (*x, *y);
            }
        }
        HandFrame::from_xy(c)
    }

    /// Same hand with one keypoint moved.
    pub fn with_point(hand: &HandFrame, landmark: Landmark, x: i32, y: i32) -> HandFrame {
        let mut c = [(0, 0); LANDMARK_COUNT];
        for (i, p) in hand.points().iter().enumerate() {
            c[i] = (p.x, p.y);
        }
        c[landmark.index()] = (x, y);
        HandFrame::from_xy(c)
    }

    /// Place the thumb tip `distance` pixels to the right of the index tip.
    pub fn pinched(hand: &HandFrame, distance: i32) -> HandFrame {
        let index = hand[Landmark::IndexTip];
        with_point(hand, Landmark::ThumbTip, index.x + distance, index.y)
    }

    pub const OPEN: [bool; 5] = [true; 5];
    pub const FIST: [bool; 5] = [false; 5];
    pub const POINTING: [bool; 5] = [false, true, false, false, false];
    pub const TWO_UP: [bool; 5] = [false, true, true, false, false];
}
