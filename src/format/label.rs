//! Normalized text label format.
//!
//! One text file per image, one line per shape:
//!
//! - box: `class_id x_center y_center width height`
//! - polygon: `class_id x1 y1 x2 y2 ... xn yn`
//!
//! All coordinates are normalized by the image width (x) or height (y) and
//! written with six decimal digits.

use std::path::Path;

use crate::constants::{LABEL_PRECISION, MIN_POLYGON_VERTICES};
use crate::format::error::FormatError;
use crate::format::traits::{LabelLine, WriteReport};
use crate::model::{BoundingBox, Point, Polygon};

/// Fields on a box line before any trailing extras.
const BOX_FIELDS: usize = 5;

impl LabelLine for BoundingBox {
    fn kind() -> &'static str {
        "box"
    }

    fn encode(&self, image_width: f64, image_height: f64) -> Option<String> {
        if !self.is_finite() {
            return None;
        }

        let (x1, y1, x2, y2) = (
            self.x1 as f64,
            self.y1 as f64,
            self.x2 as f64,
            self.y2 as f64,
        );
        let cx = (x1 + x2) / (2.0 * image_width);
        let cy = (y1 + y2) / (2.0 * image_height);
        let w = (x2 - x1) / image_width;
        let h = (y2 - y1) / image_height;

        Some(format!(
            "{} {:.p$} {:.p$} {:.p$} {:.p$}",
            self.class_id,
            cx,
            cy,
            w,
            h,
            p = LABEL_PRECISION
        ))
    }

    fn decode(line: &str, image_width: f64, image_height: f64) -> Result<Self, FormatError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < BOX_FIELDS {
            return Err(FormatError::FieldCount {
                expected: "at least 5",
                found: parts.len(),
            });
        }

        let class_id = parse_class_id(parts[0])?;
        let cx = parse_coordinate(parts[1])?;
        let cy = parse_coordinate(parts[2])?;
        let w = parse_coordinate(parts[3])?;
        let h = parse_coordinate(parts[4])?;
        if w <= 0.0 || h <= 0.0 {
            return Err(FormatError::invalid_coordinates(format!(
                "box size {}x{} is not positive",
                w, h
            )));
        }

        // Back to pixel corners, rounded to whole pixels
        let x1 = ((cx - w / 2.0) * image_width).round();
        let y1 = ((cy - h / 2.0) * image_height).round();
        let x2 = ((cx + w / 2.0) * image_width).round();
        let y2 = ((cy + h / 2.0) * image_height).round();
        if x2 <= x1 || y2 <= y1 {
            return Err(FormatError::invalid_coordinates(
                "box collapses to zero pixels",
            ));
        }

        Ok(BoundingBox::new(
            x1 as f32, y1 as f32, x2 as f32, y2 as f32, class_id,
        ))
    }
}

impl LabelLine for Polygon {
    fn kind() -> &'static str {
        "polygon"
    }

    fn encode(&self, image_width: f64, image_height: f64) -> Option<String> {
        if !self.is_finite() || self.points.is_empty() {
            return None;
        }

        let mut line = self.class_id.to_string();
        for p in &self.points {
            line.push_str(&format!(
                " {:.p$} {:.p$}",
                p.x as f64 / image_width,
                p.y as f64 / image_height,
                p = LABEL_PRECISION
            ));
        }
        Some(line)
    }

    fn decode(line: &str, image_width: f64, image_height: f64) -> Result<Self, FormatError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let min_fields = 1 + 2 * MIN_POLYGON_VERTICES;
        if parts.len() < min_fields || parts.len() % 2 == 0 {
            return Err(FormatError::FieldCount {
                expected: "an odd count of at least 7",
                found: parts.len(),
            });
        }

        let class_id = parse_class_id(parts[0])?;
        let points = parts[1..]
            .chunks_exact(2)
            .map(|pair| {
                let x = parse_coordinate(pair[0])? * image_width;
                let y = parse_coordinate(pair[1])? * image_height;
                Ok(Point::new(x as f32, y as f32))
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(Polygon::new(points, class_id))
    }
}

fn parse_class_id(token: &str) -> Result<u32, FormatError> {
    token
        .parse()
        .map_err(|_| FormatError::invalid_format(format!("'{}' is not a class id", token)))
}

fn parse_coordinate(token: &str) -> Result<f64, FormatError> {
    let value: f64 = token
        .parse()
        .map_err(|_| FormatError::invalid_coordinates(format!("'{}' is not a number", token)))?;
    if !value.is_finite() {
        return Err(FormatError::invalid_coordinates(format!(
            "'{}' is not finite",
            token
        )));
    }
    Ok(value)
}

/// Encode shapes into label file content, one line each.
///
/// Shapes with non-finite coordinates are skipped and counted in the report.
pub fn encode_labels<T: LabelLine>(
    shapes: &[T],
    image_width: u32,
    image_height: u32,
) -> (String, WriteReport) {
    let mut report = WriteReport::default();
    let mut content = String::new();

    for (idx, shape) in shapes.iter().enumerate() {
        match shape.encode(image_width as f64, image_height as f64) {
            Some(line) => {
                content.push_str(&line);
                content.push('\n');
                report.written += 1;
            }
            None => {
                log::warn!(
                    "Skipping {} {}: coordinates are not finite",
                    T::kind(),
                    idx
                );
                report.skipped += 1;
            }
        }
    }

    (content, report)
}

/// Decode label file content, skipping malformed lines individually.
pub fn decode_labels<T: LabelLine>(content: &str, image_width: u32, image_height: u32) -> Vec<T> {
    let mut shapes = Vec::new();

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match T::decode(line, image_width as f64, image_height as f64) {
            Ok(shape) => shapes.push(shape),
            Err(e) => {
                log::warn!(
                    "Skipping malformed {} label on line {}: {}",
                    T::kind(),
                    line_no + 1,
                    e
                );
            }
        }
    }

    shapes
}

/// Write a label file for one image.
pub fn write_label_file<T: LabelLine>(
    path: &Path,
    shapes: &[T],
    image_width: u32,
    image_height: u32,
) -> Result<WriteReport, FormatError> {
    let (content, report) = encode_labels(shapes, image_width, image_height);
    std::fs::write(path, content)?;

    log::info!(
        "Wrote {} {} labels to {:?} ({} skipped)",
        report.written,
        T::kind(),
        path,
        report.skipped
    );

    Ok(report)
}

/// Read a label file for one image. A missing file yields no shapes.
pub fn read_label_file<T: LabelLine>(
    path: &Path,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<T>, FormatError> {
    if !path.exists() {
        log::debug!("No {} labels at {:?}", T::kind(), path);
        return Ok(Vec::new());
    }

    // Invalid UTF-8 only spoils the lines it appears on
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let shapes = decode_labels(&content, image_width, image_height);
    log::info!("Loaded {} {} labels from {:?}", shapes.len(), T::kind(), path);
    Ok(shapes)
}
