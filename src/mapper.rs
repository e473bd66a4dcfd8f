// Camera pixel -> screen pixel, with exponential smoothing.
// Step 1 maps the active region linearly onto the screen (clamped at the edges).
// Step 2 eases the cursor towards that target: smoothed += (target - smoothed) / k.

use crate::error::{Error, Result};
use crate::types::{ActiveRegion, ScreenSize};

/// Linear map of `v` from `[in_lo, in_hi]` onto `[0, out_hi]`, clamping
/// anything outside the input range to the nearest output end.
pub fn interp(v: f64, in_lo: f64, in_hi: f64, out_hi: f64) -> f64 {
    if v <= in_lo {
        return 0.0;
    }
    if v >= in_hi {
        return out_hi;
    }
    (v - in_lo) / (in_hi - in_lo) * out_hi
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    region: ActiveRegion,
    screen: ScreenSize,
    smoothing: f64,
    // Last smoothed position; starts at the screen origin.
    prev: (f64, f64),
}

impl CoordinateMapper {
    pub fn new(region: ActiveRegion, screen: ScreenSize, smoothing: f64) -> Result<Self> {
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(Error::Config(format!(
                "smoothing factor must be > 0, got {smoothing}"
            )));
        }
        if !region.is_valid() {
            return Err(Error::Config(format!(
                "margin {} leaves no active region in a {}x{} frame",
                region.margin, region.frame_width, region.frame_height
            )));
        }
        Ok(Self { region, screen, smoothing, prev: (0.0, 0.0) })
    }

    /// Unsmoothed screen target for a raw camera point.
    pub fn target(&self, x: i32, y: i32) -> (f64, f64) {
        let (x_lo, x_hi) = self.region.x_range();
        let (y_lo, y_hi) = self.region.y_range();
        (
            interp(x as f64, x_lo, x_hi, self.screen.width as f64),
            interp(y as f64, y_lo, y_hi, self.screen.height as f64),
        )
    }

    /// Advance the smoothing state towards the point and return the new position.
    pub fn update(&mut self, x: i32, y: i32) -> (f64, f64) {
        let (tx, ty) = self.target(x, y);
        let (px, py) = self.prev;
        let next = (
            px + (tx - px) / self.smoothing,
            py + (ty - py) / self.smoothing,
        );
        self.prev = next;
        next
    }

    pub fn position(&self) -> (f64, f64) {
        self.prev
    }

    /// Integer cursor position for the OS; the fractional part is dropped.
    pub fn cursor(&self) -> (i32, i32) {
        (self.prev.0 as i32, self.prev.1 as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> ActiveRegion {
        ActiveRegion { frame_width: 640, frame_height: 480, margin: 50 }
    }

    fn screen() -> ScreenSize {
        ScreenSize { width: 1920, height: 1080 }
    }

    #[test]
    fn test_interp_endpoints_and_clamp() {
        assert_eq!(interp(50.0, 50.0, 590.0, 1920.0), 0.0);
        assert_eq!(interp(590.0, 50.0, 590.0, 1920.0), 1920.0);
        assert_eq!(interp(320.0, 50.0, 590.0, 1920.0), 960.0);
        assert_eq!(interp(0.0, 50.0, 590.0, 1920.0), 0.0);
        assert_eq!(interp(640.0, 50.0, 590.0, 1920.0), 1920.0);
    }

    #[test]
    fn test_target_is_monotonic() {
        let m = CoordinateMapper::new(region(), screen(), 1.0).unwrap();
        let mut last = f64::NEG_INFINITY;
        for x in -10..660 {
            let (tx, _) = m.target(x, 240);
            assert!(tx >= last, "x={x}");
            assert!((0.0..=1920.0).contains(&tx));
            last = tx;
        }
    }

    #[test]
    fn test_k_one_jumps_to_target() {
        let mut m = CoordinateMapper::new(region(), screen(), 1.0).unwrap();
        let pos = m.update(590, 430);
        assert_eq!(pos, (1920.0, 1080.0));
        assert_eq!(m.cursor(), (1920, 1080));
    }

    #[test]
    fn test_smoothing_recurrence() {
        let k = 9.0;
        let mut m = CoordinateMapper::new(region(), screen(), k).unwrap();
        let mut expected = (0.0_f64, 0.0_f64);
        for (x, y) in [(590, 430), (320, 240), (100, 400), (590, 50)] {
            let (tx, ty) = m.target(x, y);
            expected = (expected.0 + (tx - expected.0) / k, expected.1 + (ty - expected.1) / k);
            let got = m.update(x, y);
            assert!((got.0 - expected.0).abs() < 1e-9);
            assert!((got.1 - expected.1).abs() < 1e-9);
        }
        assert_eq!(m.position(), expected);
    }

    #[test]
    fn test_initial_position_is_origin() {
        let m = CoordinateMapper::new(region(), screen(), 5.0).unwrap();
        assert_eq!(m.position(), (0.0, 0.0));
        assert_eq!(m.cursor(), (0, 0));
    }

    #[test]
    fn test_rejects_bad_smoothing_and_region() {
        assert!(CoordinateMapper::new(region(), screen(), 0.0).is_err());
        assert!(CoordinateMapper::new(region(), screen(), -2.0).is_err());
        assert!(CoordinateMapper::new(region(), screen(), f64::NAN).is_err());
        let bad = ActiveRegion { frame_width: 100, frame_height: 480, margin: 50 };
        assert!(CoordinateMapper::new(bad, screen(), 3.0).is_err());
    }
}
