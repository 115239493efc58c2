//! Per-stroke brush mask and its conversion into shapes.

use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point as PixelPoint;

use crate::constants::{CONTOUR_EPSILON_RATIO, MIN_POLYGON_VERTICES};
use crate::model::Point;

const PAINTED: Luma<u8> = Luma([255]);

/// Image-sized binary bitmap accumulating one freehand stroke.
#[derive(Debug, Clone)]
pub struct BrushMask {
    pixels: GrayImage,
}

impl BrushMask {
    /// Create an empty mask matching the image size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::new(width, height),
        }
    }

    /// Raw bitmap, nonzero where painted.
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Union a filled circle into the mask. Parts outside the image are dropped.
    pub fn stamp(&mut self, center: Point, radius: u32) {
        let cx = center.x.round() as i32;
        let cy = center.y.round() as i32;
        draw_filled_circle_mut(&mut self.pixels, (cx, cy), radius as i32, PAINTED);
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[0] == 0)
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` of all painted pixels.
    pub fn bounding_rect(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in self.pixels.enumerate_pixels() {
            if p.0[0] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
            });
        }
        bounds
    }

    /// Outline of the largest painted region, simplified.
    ///
    /// Only external contours are considered. The largest by enclosed area is
    /// simplified with a Douglas-Peucker tolerance proportional to its
    /// perimeter. Returns `None` when fewer than three vertices remain.
    pub fn largest_outline(&self) -> Option<Vec<Point>> {
        let contours = find_contours::<i32>(&self.pixels);

        let largest = contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| (shoelace_area(&c.points), c))
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, c)| c)?;

        let epsilon = CONTOUR_EPSILON_RATIO * arc_length(&largest.points, true);
        let simplified = approximate_polygon_dp(&largest.points, epsilon, true);

        if simplified.len() < MIN_POLYGON_VERTICES {
            log::debug!(
                "Outline collapsed to {} vertices, discarding",
                simplified.len()
            );
            return None;
        }

        Some(
            simplified
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect(),
        )
    }
}

/// Unsigned area enclosed by a closed pixel contour.
fn shoelace_area(points: &[PixelPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    (twice_area as f64 / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_has_no_shapes() {
        let mask = BrushMask::new(100, 80);
        assert!(mask.is_empty());
        assert_eq!(mask.bounding_rect(), None);
        assert_eq!(mask.largest_outline(), None);
    }

    #[test]
    fn test_single_stamp_bounds() {
        let mut mask = BrushMask::new(100, 80);
        mask.stamp(Point::new(50.0, 40.0), 5);
        assert_eq!(mask.bounding_rect(), Some((45, 35, 55, 45)));
    }

    #[test]
    fn test_stamp_clipped_at_border() {
        let mut mask = BrushMask::new(100, 80);
        mask.stamp(Point::new(1.0, 1.0), 10);
        let (x1, y1, x2, y2) = mask.bounding_rect().unwrap();
        assert_eq!((x1, y1), (0, 0));
        assert_eq!((x2, y2), (11, 11));
    }

    #[test]
    fn test_stroke_union_bounds() {
        let mut mask = BrushMask::new(200, 200);
        for i in 0..=10 {
            let t = i as f32 * 4.0;
            mask.stamp(Point::new(30.0 + t, 30.0 + t), 3);
        }
        assert_eq!(mask.bounding_rect(), Some((27, 27, 73, 73)));
    }

    #[test]
    fn test_largest_outline_picks_bigger_region() {
        let mut mask = BrushMask::new(200, 200);
        mask.stamp(Point::new(30.0, 30.0), 4);
        mask.stamp(Point::new(120.0, 120.0), 30);

        let outline = mask.largest_outline().unwrap();
        assert!(outline.len() >= 3);
        for p in &outline {
            assert!(p.x >= 85.0 && p.x <= 155.0, "vertex {:?} not on big disc", p);
            assert!(p.y >= 85.0 && p.y <= 155.0, "vertex {:?} not on big disc", p);
        }
    }

    #[test]
    fn test_shoelace_area_square() {
        let square = [
            PixelPoint::new(0, 0),
            PixelPoint::new(10, 0),
            PixelPoint::new(10, 10),
            PixelPoint::new(0, 10),
        ];
        assert_eq!(shoelace_area(&square), 100.0);
    }
}
