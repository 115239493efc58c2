//! Canvas/image coordinate mapping under pan and zoom.
//!
//! The image is drawn centered on the canvas at `scale`, shifted by an
//! accumulated pan offset. Shapes never pass through this transform except
//! when rendered or when pointer input is translated into image space.

use crate::constants::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::model::Point;

/// Represents the pan/zoom state for one displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Accumulated pan delta in canvas pixels
    pub pan_x: f32,
    pub pan_y: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub image_width: f32,
    pub image_height: f32,
}

impl ViewTransform {
    /// Create an identity-scale transform for an image shown on a canvas.
    pub fn new(canvas_width: u32, canvas_height: u32, image_width: u32, image_height: u32) -> Self {
        Self {
            scale: 1.0,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width: canvas_width as f32,
            canvas_height: canvas_height as f32,
            image_width: image_width as f32,
            image_height: image_height as f32,
        }
    }

    /// Set the allowed scale range, clamping the current scale into it.
    pub fn with_scale_bounds(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale = self.scale.clamp(min_scale, max_scale);
        self
    }

    /// Canvas position of the image's top-left corner.
    ///
    /// Centers the scaled image on the canvas (rounded down to whole pixels)
    /// and adds the pan offset.
    pub fn offset(&self) -> (f32, f32) {
        let scaled_w = (self.image_width * self.scale).trunc();
        let scaled_h = (self.image_height * self.scale).trunc();
        let x = ((self.canvas_width - scaled_w) / 2.0).floor() + self.pan_x;
        let y = ((self.canvas_height - scaled_h) / 2.0).floor() + self.pan_y;
        (x, y)
    }

    /// Map a canvas position to image coordinates.
    pub fn to_image(&self, canvas_x: f32, canvas_y: f32) -> Point {
        let (ox, oy) = self.offset();
        Point::new((canvas_x - ox) / self.scale, (canvas_y - oy) / self.scale)
    }

    /// Map image coordinates to a canvas position.
    pub fn to_canvas(&self, point: &Point) -> (f32, f32) {
        let (ox, oy) = self.offset();
        (point.x * self.scale + ox, point.y * self.scale + oy)
    }

    /// Apply one wheel step. Positive delta zooms in, negative zooms out.
    ///
    /// Returns true if the scale changed.
    pub fn zoom(&mut self, delta: f32) -> bool {
        let factor = if delta > 0.0 {
            ZOOM_IN_FACTOR
        } else if delta < 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            return false;
        };

        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let changed = new_scale != self.scale;
        self.scale = new_scale;
        changed
    }

    /// Apply a pan delta in canvas pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Scale 1.0 and no pan.
    pub fn reset(&mut self) {
        self.scale = 1.0_f32.clamp(self.min_scale, self.max_scale);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}
