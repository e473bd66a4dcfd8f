// Click and drag decisions from finger states + pinch distance + click timer.
//
// Rules, evaluated every frame that has a hand:
// - pinch active, index+middle up: start dragging (button down once)
// - pinch active, index up, middle down: end any drag, then click if the pinch
//   is fresh AND the cooldown has passed; latch `pinching` either way
// - pinch inactive: re-arm the click latch, end any drag
// Movement is decided separately (see `wants_movement`) and may fire in the
// same frame as any of the above.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::fingers::{Finger, FingerStates};
use crate::pointer::PointerCommand;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Pinch counts as active strictly below this many camera pixels.
    pub pinch_threshold_px: f32,
    /// Minimum time between two clicks.
    pub click_cooldown: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold_px: 40.0,
            click_cooldown: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureState {
    /// Click latch: set while a click-pinch is held, cleared on release.
    pub pinching: bool,
    /// Primary button is held down by us.
    pub dragging: bool,
    /// `None` until the first click of the session.
    pub last_click: Option<Instant>,
}

/// What the HUD shows for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Moving,
    ClickPending,
    Dragging,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Moving => "MOVE",
            Self::ClickPending => "CLICK",
            Self::Dragging => "DRAG",
        }
    }
}

/// Index up and middle down steers the cursor, pinch or not.
#[inline]
pub fn wants_movement(fingers: &FingerStates) -> bool {
    fingers.is_up(Finger::Index) && !fingers.is_up(Finger::Middle)
}

#[derive(Debug, Clone, Default)]
pub struct GestureStateMachine {
    config: GestureConfig,
    state: GestureState,
}

impl GestureStateMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self { config, state: GestureState::default() }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn config(&self) -> GestureConfig {
        self.config
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.state.last_click {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.config.click_cooldown,
        }
    }

    /// Apply the click/drag rules for one frame and return the commands to
    /// issue, in order. State is updated as if every command succeeds.
    pub fn step(&mut self, fingers: &FingerStates, pinch_distance: f32, now: Instant) -> Vec<PointerCommand> {
        let mut out = Vec::new();
        let index_up = fingers.is_up(Finger::Index);
        let middle_up = fingers.is_up(Finger::Middle);

        if pinch_distance < self.config.pinch_threshold_px {
            if index_up && middle_up {
                if !self.state.dragging {
                    debug!(distance = pinch_distance, "drag start");
                    out.push(PointerCommand::ButtonDown);
                    self.state.dragging = true;
                }
            } else if index_up {
                if self.state.dragging {
                    debug!("drag handed off to click");
                    out.push(PointerCommand::ButtonUp);
                    self.state.dragging = false;
                }
                if !self.state.pinching {
                    if self.cooldown_elapsed(now) {
                        debug!(distance = pinch_distance, "click");
                        out.push(PointerCommand::Click);
                        self.state.last_click = Some(now);
                    } else {
                        debug!("click suppressed by cooldown");
                    }
                }
                self.state.pinching = true;
            }
        } else {
            self.state.pinching = false;
            if self.state.dragging {
                debug!(distance = pinch_distance, "drag end");
                out.push(PointerCommand::ButtonUp);
                self.state.dragging = false;
            }
        }
        out
    }

    /// Release a held button, e.g. on shutdown.
    pub fn release(&mut self) -> Option<PointerCommand> {
        if self.state.dragging {
            self.state.dragging = false;
            return Some(PointerCommand::ButtonUp);
        }
        None
    }

    pub fn mode(&self, fingers: &FingerStates) -> Mode {
        if self.state.dragging {
            Mode::Dragging
        } else if self.state.pinching {
            Mode::ClickPending
        } else if wants_movement(fingers) {
            Mode::Moving
        } else {
            Mode::Idle
        }
    }
}
