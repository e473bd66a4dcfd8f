// Owns every piece of state that survives from one frame to the next (the
// smoothing position and the gesture flags) and turns a frame into commands.

use std::time::Instant;

use crate::fingers::{self, FingerStates};
use crate::gesture::{self, GestureConfig, GestureState, GestureStateMachine, Mode};
use crate::landmarks::{HandFrame, Landmark};
use crate::mapper::CoordinateMapper;
use crate::pinch::Pinch;
use crate::pointer::PointerCommand;

/// What was seen on a frame with a hand; the overlay draws from this.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub fingers: FingerStates,
    pub pinch: Pinch,
    pub pinch_active: bool,
    /// The cursor was steered this frame.
    pub moved: bool,
    pub mode: Mode,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// In issue order: the move first, then drag/click commands.
    pub commands: Vec<PointerCommand>,
    /// `None` when the frame had no hand.
    pub observation: Option<Observation>,
}

pub struct GestureController {
    mapper: CoordinateMapper,
    machine: GestureStateMachine,
}

impl GestureController {
    pub fn new(mapper: CoordinateMapper, gestures: GestureConfig) -> Self {
        Self { mapper, machine: GestureStateMachine::new(gestures) }
    }

    pub fn update(&mut self, frame: Option<&HandFrame>, now: Instant) -> FrameOutput {
        // No hand: nothing runs and nothing changes.
        let Some(hand) = frame else {
            return FrameOutput::default();
        };

        let fingers = fingers::classify(hand);
        let pinch = Pinch::of_hand(hand);
        let mut commands = Vec::new();

        let moved = gesture::wants_movement(&fingers);
        if moved {
            let tip = hand[Landmark::IndexTip];
            self.mapper.update(tip.x, tip.y);
            let (x, y) = self.mapper.cursor();
            commands.push(PointerCommand::Move { x, y });
        }

        commands.extend(self.machine.step(&fingers, pinch.distance, now));

        let observation = Observation {
            fingers,
            pinch,
            pinch_active: pinch.is_active(self.machine.config().pinch_threshold_px),
            moved,
            mode: self.machine.mode(&fingers),
        };
        FrameOutput { commands, observation: Some(observation) }
    }

    /// Commands needed to leave the desktop in a clean state on exit.
    pub fn shutdown(&mut self) -> Vec<PointerCommand> {
        self.machine.release().into_iter().collect()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.machine.state()
    }

    pub fn smoothed_position(&self) -> (f64, f64) {
        self.mapper.position()
    }

    #[cfg(test)]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fingers::fixtures::{FIST, OPEN, POINTING, TWO_UP, hand, pinched, with_point};
    use crate::types::{ActiveRegion, ScreenSize};

    const W: u32 = 640;
    const H: u32 = 480;
    const MARGIN: u32 = 50;
    const SCREEN: ScreenSize = ScreenSize { width: 1920, height: 1080 };

    fn controller(k: f64) -> GestureController {
        let region = ActiveRegion { frame_width: W, frame_height: H, margin: MARGIN };
        let mapper = CoordinateMapper::new(region, SCREEN, k).unwrap();
        GestureController::new(
            mapper,
            GestureConfig { pinch_threshold_px: 40.0, click_cooldown: Duration::from_millis(300) },
        )
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    fn count(out: &FrameOutput, cmd: PointerCommand) -> usize {
        out.commands.iter().filter(|c| **c == cmd).count()
    }

    fn moves(out: &FrameOutput) -> usize {
        out.commands
            .iter()
            .filter(|c| matches!(c, PointerCommand::Move { .. }))
            .count()
    }

    #[test]
    fn test_no_hand_changes_nothing() {
        let mut c = controller(3.0);
        let t0 = Instant::now();
        c.update(Some(&pinched(&hand(TWO_UP), 10)), t0);
        let before_state = c.gesture_state();
        let before_pos = c.smoothed_position();

        let out = c.update(None, at(t0, 500));
        assert!(out.commands.is_empty());
        assert!(out.observation.is_none());
        assert_eq!(c.gesture_state(), before_state);
        assert!(c.gesture_state().dragging);
        assert_eq!(c.smoothed_position(), before_pos);
    }

    #[test]
    fn test_open_hand_far_pinch_is_idle() {
        let mut c = controller(3.0);
        let out = c.update(Some(&pinched(&hand(OPEN), 120)), Instant::now());
        assert!(out.commands.is_empty());
        let obs = out.observation.unwrap();
        assert_eq!(obs.mode, Mode::Idle);
        assert!(!obs.moved);
        assert!(!obs.pinch_active);
    }

    #[test]
    fn test_fist_never_moves() {
        let mut c = controller(1.0);
        let out = c.update(Some(&hand(FIST)), Instant::now());
        assert_eq!(moves(&out), 0);
        assert_eq!(c.smoothed_position(), (0.0, 0.0));
    }

    #[test]
    fn test_move_and_click_in_same_frame() {
        let mut c = controller(1.0);
        let out = c.update(Some(&pinched(&hand(POINTING), 10)), Instant::now());
        // Movement is not gated by the pinch
        assert_eq!(out.commands.len(), 2);
        assert!(matches!(out.commands[0], PointerCommand::Move { .. }));
        assert_eq!(out.commands[1], PointerCommand::Click);
    }

    #[test]
    fn test_move_uses_index_tip() {
        let mut c = controller(1.0);
        let h = with_point(&hand(POINTING), Landmark::IndexTip, 590, 50);
        let h = with_point(&h, Landmark::ThumbTip, 100, 400);
        let out = c.update(Some(&h), Instant::now());
        assert_eq!(out.commands, vec![PointerCommand::Move { x: 1920, y: 0 }]);
    }

    // 10 frames sweeping the index tip from the left margin to the right one.
    #[test]
    fn test_scenario_linear_sweep_then_settle() {
        let k = 9.0;
        let mut c = controller(k);
        let t0 = Instant::now();
        // Thumb parked far from every index position so no pinch fires
        let base = with_point(&hand(POINTING), Landmark::ThumbTip, 620, 460);

        let mut expected = 0.0_f64;
        let mut last_x = i32::MIN;
        let mut move_count = 0;
        for i in 0..10u32 {
            let raw_x = (MARGIN + i * (W - 2 * MARGIN) / 9) as i32;
            let h = with_point(&base, Landmark::IndexTip, raw_x, 200);
            let target = c.mapper().target(raw_x, 200).0;
            expected += (target - expected) / k;

            let out = c.update(Some(&h), at(t0, i as u64 * 33));
            move_count += moves(&out);
            let PointerCommand::Move { x, .. } = out.commands[0] else {
                panic!("expected a move, got {:?}", out.commands);
            };
            assert!(x >= last_x);
            last_x = x;
            assert!((c.smoothed_position().0 - expected).abs() < 1e-9);
            assert!(c.smoothed_position().0 <= target);
        }
        assert_eq!(move_count, 10);

        // Holding at the right edge: the gap shrinks by (1 - 1/k) every frame.
        let right = with_point(&base, Landmark::IndexTip, (W - MARGIN) as i32, 200);
        let mut err = SCREEN.width as f64 - c.smoothed_position().0;
        for i in 10..40u64 {
            c.update(Some(&right), at(t0, i * 33));
            let next = SCREEN.width as f64 - c.smoothed_position().0;
            assert!(next < err);
            assert!((next - err * (1.0 - 1.0 / k)).abs() < 1e-6);
            err = next;
        }
    }

    // Pinch held with index+middle up, then released.
    #[test]
    fn test_scenario_drag_press_once_release_once() {
        let mut c = controller(5.0);
        let t0 = Instant::now();
        let dragging = pinched(&hand(TWO_UP), 10);

        let first = c.update(Some(&dragging), t0);
        assert_eq!(first.commands, vec![PointerCommand::ButtonDown]);
        for i in 1..5 {
            let out = c.update(Some(&dragging), at(t0, i * 33));
            assert!(out.commands.is_empty());
            assert_eq!(out.observation.unwrap().mode, Mode::Dragging);
        }

        let out = c.update(Some(&pinched(&hand(TWO_UP), 60)), at(t0, 200));
        assert_eq!(out.commands, vec![PointerCommand::ButtonUp]);
        assert!(!c.gesture_state().dragging);
    }

    // Click at 0.0s, release at 0.1s, re-pinch at 0.2s, release+re-pinch at 0.5s.
    #[test]
    fn test_scenario_click_debounce() {
        let mut c = controller(5.0);
        let t0 = Instant::now();
        let pinch = pinched(&hand(POINTING), 10);
        let open = pinched(&hand(POINTING), 80);

        let frames = [
            (0, &pinch),
            (100, &open),
            (200, &pinch),
            (300, &pinch),
            (450, &open),
            (500, &pinch),
            (600, &pinch),
        ];
        let mut clicks = Vec::new();
        for (ms, h) in frames {
            let out = c.update(Some(h), at(t0, ms));
            if count(&out, PointerCommand::Click) > 0 {
                clicks.push(ms);
            }
        }
        assert_eq!(clicks, vec![0, 500]);
    }

    #[test]
    fn test_middle_drop_releases_then_clicks() {
        let mut c = controller(5.0);
        let t0 = Instant::now();
        c.update(Some(&pinched(&hand(TWO_UP), 10)), t0);
        let out = c.update(Some(&pinched(&hand(POINTING), 10)), at(t0, 33));
        assert_eq!(count(&out, PointerCommand::ButtonUp), 1);
        assert_eq!(count(&out, PointerCommand::Click), 1);
        assert_eq!(moves(&out), 1);
        // Move is issued before the button/click commands
        assert!(matches!(out.commands[0], PointerCommand::Move { .. }));
    }

    #[test]
    fn test_lost_hand_mid_drag_keeps_button_held() {
        let mut c = controller(5.0);
        let t0 = Instant::now();
        c.update(Some(&pinched(&hand(TWO_UP), 10)), t0);
        for i in 1..10 {
            assert!(c.update(None, at(t0, i * 33)).commands.is_empty());
        }
        assert!(c.gesture_state().dragging);
        let out = c.update(Some(&pinched(&hand(TWO_UP), 90)), at(t0, 400));
        assert_eq!(out.commands, vec![PointerCommand::ButtonUp]);
    }

    #[test]
    fn test_shutdown_releases_held_button() {
        let mut c = controller(5.0);
        assert!(c.shutdown().is_empty());
        c.update(Some(&pinched(&hand(TWO_UP), 10)), Instant::now());
        assert_eq!(c.shutdown(), vec![PointerCommand::ButtonUp]);
        assert!(c.shutdown().is_empty());
    }
}
