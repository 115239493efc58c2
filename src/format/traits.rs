//! Trait definitions for label line codecs.

use crate::format::error::FormatError;

/// A shape that can be stored as one line of a normalized label file.
///
/// Coordinates on disk are divided by the image width (x) or height (y), so
/// the same file stays valid for any display scale of the image.
pub trait LabelLine: Sized {
    /// Short name used in log messages (e.g., "box").
    fn kind() -> &'static str;

    /// Encode the shape as a label line, or `None` if any coordinate is not finite.
    fn encode(&self, image_width: f64, image_height: f64) -> Option<String>;

    /// Decode one non-empty label line into image-pixel coordinates.
    fn decode(line: &str, image_width: f64, image_height: f64) -> Result<Self, FormatError>;
}

/// Result of writing a label file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Number of lines written.
    pub written: usize,
    /// Number of shapes skipped because of non-finite coordinates.
    pub skipped: usize,
}

impl WriteReport {
    /// Check if any shape was skipped.
    pub fn has_skipped(&self) -> bool {
        self.skipped > 0
    }
}
