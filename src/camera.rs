// Opens the webcam and hands out mirrored RGB frames.
// Mirroring matters: the finger classifier assumes "outward" is larger x.

use crate::error::Error;

use image::RgbImage;
use image::imageops::flip_horizontal_in_place;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use tracing::info;

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (falls back to the closest format).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(
            index,
            width = actual.width(),
            height = actual.height(),
            "camera stream open"
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame (blocks until the camera has one), decode it and mirror it.
    pub fn next_frame(&mut self) -> Result<RgbImage, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let mut rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        flip_horizontal_in_place(&mut rgb);
        Ok(rgb)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        // Release the device for other apps; nothing useful to do on failure.
        let _ = self.cam.stop_stream();
    }
}

/// Counts consecutive failed grabs. `max == 0` never runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureBudget {
    max: u32,
    count: u32,
}

impl FailureBudget {
    pub fn new(max: u32) -> Self {
        Self { max, count: 0 }
    }

    /// Record one more failure; true once the budget is spent.
    pub fn record_failure(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.max != 0 && self.count >= self.max
    }

    /// A good frame starts the count over.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
