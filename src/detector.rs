//! Hand landmark detection via an external detector process.
//!
//! The detector is a black box (typically a MediaPipe script) talking over
//! stdio. It prints `READY` once, then for every frame it reads a 12-byte
//! little-endian header (width, height, channels) plus packed RGB bytes and
//! answers with one JSON line:
//!
//! ```text
//! {"hands":[{"score":0.93,"landmarks":[{"x":0.51,"y":0.62}, ...]}],"error":null}
//! ```
//!
//! Coordinates are normalised to [0, 1]; at most one hand is kept.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DetectorConfig;
use crate::error::{Error, Result};
use crate::landmarks::{HandFrame, LandmarkPoint};

pub trait HandDetector {
    /// Landmarks for the most confident hand in `image`, if any.
    fn detect(&mut self, image: &RgbImage) -> Result<Option<HandFrame>>;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

fn full_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn one reply line into a hand in pixel coordinates.
///
/// Detector-side errors and low-confidence hands mean "no hand". A confident
/// hand with the wrong number of landmarks is a protocol error.
pub fn parse_reply(line: &str, width: u32, height: u32, min_confidence: f32) -> Result<Option<HandFrame>> {
    let reply: DetectionReply = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad reply {:?}: {e}", line.trim())))?;

    if let Some(err) = reply.error {
        warn!(error = %err, "detector reported an error");
        return Ok(None);
    }

    let Some(hand) = reply.hands.into_iter().find(|h| h.score >= min_confidence) else {
        return Ok(None);
    };

    let points = hand
        .landmarks
        .iter()
        .enumerate()
        .map(|(i, lm)| LandmarkPoint {
            id: i as u8,
            x: (lm.x * width as f32) as i32,
            y: (lm.y * height as f32) as i32,
        })
        .collect();
    HandFrame::from_points(points).map(Some)
}

/// Detector running as a child process; killed when dropped.
pub struct ProcessDetector {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
}

impl ProcessDetector {
    pub fn spawn(config: &DetectorConfig) -> Result<Self> {
        info!(program = %config.program, args = ?config.args, "starting landmark detector");

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {}: {e}", config.program)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Detector("no stdin pipe".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Detector("no stdout pipe".into()))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let handshake = match stdout.read_line(&mut ready) {
            Ok(_) if ready.trim() == "READY" => Ok(()),
            Ok(_) => Err(Error::Detector(format!(
                "detector did not signal ready, got {:?}",
                ready.trim()
            ))),
            Err(e) => Err(Error::Detector(format!("reading handshake: {e}"))),
        };
        if let Err(e) = handshake {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
        info!("landmark detector ready");

        Ok(Self { child, stdin, stdout, min_confidence: config.min_confidence })
    }
}

impl HandDetector for ProcessDetector {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<HandFrame>> {
        let (w, h) = image.dimensions();

        self.stdin.write_all(&w.to_le_bytes())?;
        self.stdin.write_all(&h.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(image.as_raw())?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(Error::DetectorExited("output closed".into()));
        }

        let hand = parse_reply(&line, w, h, self.min_confidence)?;
        if let Some(hand) = &hand {
            debug!(points = ?hand.points().len(), "hand detected");
        }
        Ok(hand)
    }
}

impl Drop for ProcessDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
