//! Shape types stored by the editor.
//!
//! All coordinates are image-space pixels. The view transform is applied only
//! when rendering and when translating pointer input, never to stored shapes.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_POLYGON_VERTICES;

// ============================================================================
// Point
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ============================================================================
// Resize Handles
// ============================================================================

/// One of the eight grab zones of a box: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    North,
    South,
    West,
    East,
}

impl ResizeHandle {
    /// All handles in hit-test priority order (corners before edges).
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
        ResizeHandle::North,
        ResizeHandle::South,
        ResizeHandle::West,
        ResizeHandle::East,
    ];

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthWest | ResizeHandle::NorthEast
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthWest | ResizeHandle::SouthEast
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    /// Position of this handle on the given box.
    pub fn anchor(self, bbox: &BoundingBox) -> Point {
        let mid_x = (bbox.x1 + bbox.x2) / 2.0;
        let mid_y = (bbox.y1 + bbox.y2) / 2.0;
        match self {
            ResizeHandle::NorthWest => Point::new(bbox.x1, bbox.y1),
            ResizeHandle::NorthEast => Point::new(bbox.x2, bbox.y1),
            ResizeHandle::SouthWest => Point::new(bbox.x1, bbox.y2),
            ResizeHandle::SouthEast => Point::new(bbox.x2, bbox.y2),
            ResizeHandle::North => Point::new(mid_x, bbox.y1),
            ResizeHandle::South => Point::new(mid_x, bbox.y2),
            ResizeHandle::West => Point::new(bbox.x1, mid_y),
            ResizeHandle::East => Point::new(bbox.x2, mid_y),
        }
    }
}

// ============================================================================
// Bounding Box
// ============================================================================

/// An axis-aligned box given by its two corners, tagged with a class id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
    pub class_id: u32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, class_id: u32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            class_id,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Check if a point is inside the box (edges inclusive).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Find the handle within `radius` of `point`, corners first.
    pub fn hit_handle(&self, point: &Point, radius: f32) -> Option<ResizeHandle> {
        ResizeHandle::ALL.into_iter().find(|handle| {
            let anchor = handle.anchor(self);
            (point.x - anchor.x).abs() <= radius && (point.y - anchor.y).abs() <= radius
        })
    }

    /// Move the edges selected by `handle` by the drag delta.
    ///
    /// Each moved edge stops `min_size` short of the opposite edge, then the
    /// whole box is clamped into `[0, image_w] x [0, image_h]`.
    pub fn resize(
        &mut self,
        handle: ResizeHandle,
        dx: f32,
        dy: f32,
        min_size: f32,
        image_w: f32,
        image_h: f32,
    ) {
        if handle.moves_top() {
            self.y1 = (self.y1 + dy).min(self.y2 - min_size);
        }
        if handle.moves_bottom() {
            self.y2 = (self.y2 + dy).max(self.y1 + min_size);
        }
        if handle.moves_left() {
            self.x1 = (self.x1 + dx).min(self.x2 - min_size);
        }
        if handle.moves_right() {
            self.x2 = (self.x2 + dx).max(self.x1 + min_size);
        }
        self.clamp_edges(min_size, image_w, image_h);
    }

    /// Translate the box by the drag delta, keeping it inside the image.
    ///
    /// The size is preserved unless it is below `min_size` or larger than the image.
    pub fn translate_within(
        &mut self,
        dx: f32,
        dy: f32,
        min_size: f32,
        image_w: f32,
        image_h: f32,
    ) {
        let width = self.width().max(min_size).min(image_w);
        let height = self.height().max(min_size).min(image_h);
        self.x1 = (self.x1 + dx).min(image_w - width).max(0.0);
        self.y1 = (self.y1 + dy).min(image_h - height).max(0.0);
        self.x2 = self.x1 + width;
        self.y2 = self.y1 + height;
    }

    fn clamp_edges(&mut self, min_size: f32, image_w: f32, image_h: f32) {
        self.x1 = self.x1.min(image_w - min_size).max(0.0);
        self.y1 = self.y1.min(image_h - min_size).max(0.0);
        self.x2 = self.x2.min(image_w).max(self.x1 + min_size);
        self.y2 = self.y2.min(image_h).max(self.y1 + min_size);
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// A closed polygon tagged with a class id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon in order.
    pub points: Vec<Point>,
    pub class_id: u32,
}

impl Polygon {
    pub fn new(points: Vec<Point>, class_id: u32) -> Self {
        Self { points, class_id }
    }

    /// Check if the polygon has enough vertices to be kept.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POLYGON_VERTICES
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// Index of the first vertex within `radius` of `point`.
    pub fn vertex_at(&self, point: &Point, radius: f32) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.distance_to(point) <= radius)
    }

    /// Move every vertex by the same delta.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Check if a point is inside the polygon (ray casting algorithm).
    ///
    /// A horizontal ray is cast towards +x and crossings are counted with the
    /// even-odd rule. Each edge covers the half-open y-range `(min, max]`, so
    /// horizontal edges never count and a ray through a shared vertex is
    /// counted once per edge pair with the same direction. Points exactly on
    /// a vertex or edge get a fixed but unspecified answer.
    pub fn contains(&self, point: &Point) -> bool {
        if self.points.len() < MIN_POLYGON_VERTICES {
            return false;
        }

        let (x, y) = (point.x, point.y);
        let n = self.points.len();
        let mut inside = false;
        let mut p1 = self.points[0];

        for i in 1..=n {
            let p2 = self.points[i % n];
            if y > p1.y.min(p2.y) && y <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) {
                // p1.y != p2.y is guaranteed by the half-open y-range above
                let crosses = if p1.x == p2.x {
                    true
                } else {
                    let x_intersect = (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                    x <= x_intersect
                };
                if crosses {
                    inside = !inside;
                }
            }
            p1 = p2;
        }

        inside
    }
}

// ============================================================================
// Tests
// ============================================================================
