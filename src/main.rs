// Hand Mouse: steer the desktop pointer with one hand in front of a webcam.
// • Index finger up (middle down): the cursor follows your fingertip.
// • Pinch thumb + index with only the index up: left click.
// • Pinch with index + middle up: hold the left button (drag); open the pinch to drop.
// • q / ESC in the preview window quits; Ctrl-C quits with or without it.

mod camera;
mod cli;
mod config;
mod controller;
mod detector;
mod draw;
mod error;
mod fingers;
mod gesture;
mod landmarks;
mod mapper;
mod pinch;
mod pointer;
mod types;

use anyhow::Context;
use camera::{CameraCapture, FailureBudget};
use clap::Parser;
use cli::Cli;
use controller::GestureController;
use detector::{HandDetector, ProcessDetector};
use draw::{Drawer, draw_overlay, draw_text_5x7, WHITE};
use error::Error;
use mapper::CoordinateMapper;
use pointer::{EnigoPointer, dispatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use types::{FrameBuffer, ScreenSize};

/// Set from the Ctrl-C handler, polled once per frame.
#[derive(Clone, Default)]
struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "hand_mouse=debug" } else { "hand_mouse=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.resolve_config().context("loading config")?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    info!("hand-mouse v{} starting", env!("CARGO_PKG_VERSION"));

    /* --- Pointer backend + screen size --- */
    let mut pointer = EnigoPointer::new().context("opening pointer backend")?;
    let screen = match (config.screen.width, config.screen.height) {
        (Some(width), Some(height)) => ScreenSize { width, height },
        (w, h) => {
            let detected = pointer.screen_size().context("querying screen size")?;
            ScreenSize {
                width: w.unwrap_or(detected.width),
                height: h.unwrap_or(detected.height),
            }
        }
    };
    info!(width = screen.width, height = screen.height, "screen");

    /* --- Camera; the region uses whatever resolution the device really gives us --- */
    let mut cam = CameraCapture::new(config.camera.index, config.camera.width, config.camera.height)
        .context("opening camera")?;
    let (w, h) = cam.resolution();
    let region = config.region(w, h);
    let mapper = CoordinateMapper::new(region, screen, config.control.smoothing)
        .context("camera resolution does not fit the configured margin")?;
    let mut controller = GestureController::new(mapper, config.gestures());

    let mut detector = ProcessDetector::spawn(&config.detector).context("starting detector")?;

    /* --- Optional preview window --- */
    let mut drawer = if config.display.show_overlay {
        Some(Drawer::new(&config.display.title, w as usize, h as usize)?)
    } else {
        None
    };

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    let mut failures = FailureBudget::new(config.camera.max_consecutive_failures);

    // Ctrl-C breaks the loop instead of killing us, so the cleanup below runs
    let stop = StopFlag::default();
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || stop_handler.request()).context("installing Ctrl-C handler")?;

    /* ------------------------------ Main loop ------------------------------ */
    let result = loop {
        if stop.is_set() {
            info!("interrupted");
            break Ok(());
        }
        if let Some(d) = &drawer {
            if !d.is_open() || d.quit_pressed() {
                info!("quit requested");
                break Ok(());
            }
        }

        /* 1) Grab a mirrored frame; a failed grab skips this iteration. */
        let image = match cam.next_frame() {
            Ok(img) => {
                failures.reset();
                img
            }
            Err(e) => {
                let exhausted = failures.record_failure();
                warn!(error = %e, failures = failures.count(), "camera frame skipped");
                if exhausted {
                    break Err(Error::CameraFrame(format!(
                        "{} consecutive failures, last: {e}",
                        failures.count()
                    )));
                }
                continue;
            }
        };
        let now = Instant::now();

        /* 2) Landmarks. A bad reply only costs this frame. */
        let hand = match detector.detect(&image) {
            Ok(hand) => hand,
            Err(e @ (Error::MalformedHand(_) | Error::Detector(_))) => {
                warn!(error = %e, "treating frame as no hand");
                None
            }
            Err(e) => break Err(e),
        };

        /* 3) Gesture pipeline -> pointer commands (failures ignored inside dispatch). */
        let output = controller.update(hand.as_ref(), now);
        if !output.commands.is_empty() {
            debug!(
                commands = ?output.commands,
                cursor = ?controller.smoothed_position(),
                state = ?controller.gesture_state(),
                "frame output"
            );
        }
        dispatch(&mut pointer, &output.commands);

        /* 4) Preview */
        if let Some(d) = drawer.as_mut() {
            let mut screen_buf = FrameBuffer::from_rgb(&image);
            draw_overlay(&mut screen_buf, &region, hand.as_ref(), output.observation.as_ref());
            let hud = match &output.observation {
                Some(obs) => format!("{} | {} | {}", obs.mode.as_str(), obs.fingers, hud_fps_text),
                None => format!("IDLE | {}", hud_fps_text),
            };
            draw_text_5x7(&mut screen_buf, 8, 8, &hud, WHITE);
            if let Err(e) = d.present(&screen_buf) {
                break Err(e);
            }
        }

        /* 5) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    };

    // Never leave the button held down behind us.
    dispatch(&mut pointer, &controller.shutdown());
    drop(detector);
    drop(cam);

    if let Err(e) = &result {
        error!(error = %e, "stopped");
    }
    result.map_err(Into::into)
}
