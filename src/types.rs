// Small shared value types: the overlay pixel buffer and the two rectangles
// the mapper translates between.

use image::RgbImage;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Pack an RGB camera image as 0x00RRGGBB pixels.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for pixel in img.pixels() {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            pixels.push((r << 16) | (g << 8) | b);
        }
        Self { width: w as usize, height: h as usize, pixels }
    }
}

/// Addressable desktop size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// The part of the camera frame that maps onto the whole screen:
/// `[margin, width - margin] x [margin, height - margin]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRegion {
    pub frame_width: u32,
    pub frame_height: u32,
    pub margin: u32,
}

impl ActiveRegion {
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin as f64, self.frame_width as f64 - self.margin as f64)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.margin as f64, self.frame_height as f64 - self.margin as f64)
    }

    /// Both ranges must have positive length.
    pub fn is_valid(&self) -> bool {
        self.margin.saturating_mul(2) < self.frame_width
            && self.margin.saturating_mul(2) < self.frame_height
    }
}
