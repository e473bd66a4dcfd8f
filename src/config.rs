//! Session configuration, loaded once from TOML and never changed afterwards.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gesture::GestureConfig;
use crate::types::ActiveRegion;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub control: ControlConfig,
    pub screen: ScreenConfig,
    pub detector: DetectorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Device index (0 = default webcam)
    pub index: u32,
    /// Requested capture width; the device may pick something close.
    pub width: u32,
    pub height: u32,
    /// Give up after this many failed grabs in a row (0 = retry forever)
    pub max_consecutive_failures: u32,
}

/// Gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    /// Border (camera pixels) around the active region
    pub margin: u32,
    /// Smoothing factor k (> 0); 1 = no smoothing
    pub smoothing: f64,
    pub pinch_threshold_px: f32,
    pub click_cooldown_secs: f64,
}

/// Override for the desktop size; unset fields come from the pointer backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Landmark detector executable
    pub program: String,
    pub args: Vec<String>,
    /// Hands scoring below this are ignored
    pub min_confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_overlay: bool,
    pub title: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
            max_consecutive_failures: 100,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            margin: 50,
            smoothing: 9.0,
            pinch_threshold_px: 40.0,
            click_cooldown_secs: 0.3,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            args: vec!["hand_detect.py".into()],
            min_confidence: 0.7,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_overlay: true,
            title: "Hand Mouse".into(),
        }
    }
}

impl Config {
    /// Load and validate a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Active region check uses the requested resolution; main re-checks
    /// against what the camera actually delivers.
    pub fn validate(&self) -> Result<()> {
        let c = &self.control;
        if !(c.smoothing.is_finite() && c.smoothing > 0.0) {
            return Err(Error::Config(format!("control.smoothing must be > 0, got {}", c.smoothing)));
        }
        if !(c.pinch_threshold_px.is_finite() && c.pinch_threshold_px > 0.0) {
            return Err(Error::Config(format!(
                "control.pinch_threshold_px must be > 0, got {}",
                c.pinch_threshold_px
            )));
        }
        if !(c.click_cooldown_secs.is_finite() && c.click_cooldown_secs >= 0.0) {
            return Err(Error::Config(format!(
                "control.click_cooldown_secs must be >= 0, got {}",
                c.click_cooldown_secs
            )));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(Error::Config("camera width/height must be non-zero".into()));
        }
        if !self.region(self.camera.width, self.camera.height).is_valid() {
            return Err(Error::Config(format!(
                "control.margin {} leaves no active region in {}x{}",
                c.margin, self.camera.width, self.camera.height
            )));
        }
        if self.screen.width == Some(0) || self.screen.height == Some(0) {
            return Err(Error::Config("screen width/height must be non-zero".into()));
        }
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(Error::Config(format!(
                "detector.min_confidence must be within 0..=1, got {}",
                self.detector.min_confidence
            )));
        }
        if self.detector.program.trim().is_empty() {
            return Err(Error::Config("detector.program is empty".into()));
        }
        Ok(())
    }

    pub fn region(&self, frame_width: u32, frame_height: u32) -> ActiveRegion {
        ActiveRegion { frame_width, frame_height, margin: self.control.margin }
    }

    pub fn gestures(&self) -> GestureConfig {
        GestureConfig {
            pinch_threshold_px: self.control.pinch_threshold_px,
            click_cooldown: Duration::from_secs_f64(self.control.click_cooldown_secs),
        }
    }
}
