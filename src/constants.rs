//! Global constants for the detlab editor

/// Default canvas width in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;

/// Default canvas height in pixels
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Smallest allowed view scale
pub const DEFAULT_MIN_SCALE: f32 = 0.1;

/// Largest allowed view scale
pub const DEFAULT_MAX_SCALE: f32 = 5.0;

/// Scale factor applied per wheel notch when zooming in
pub const ZOOM_IN_FACTOR: f32 = 1.1;

/// Scale factor applied per wheel notch when zooming out
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Default brush radius (image pixels)
pub const DEFAULT_BRUSH_SIZE: u32 = 20;

/// Brush radius bounds
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 50;

/// Brush radius change per bracket key press
pub const BRUSH_SIZE_STEP: u32 = 5;

/// Minimum box side length at scale 1.0 (image pixels).
/// Divided by the current scale during edits.
pub const MIN_BOX_SIZE: f32 = 10.0;

/// Resize handle grab distance at scale 1.0 (image pixels).
pub const HANDLE_HIT_RADIUS: f32 = 12.0;

/// Polygon vertex grab distance (image pixels).
pub const VERTEX_HIT_RADIUS: f32 = 5.0;

/// Minimum number of vertices for a polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Douglas-Peucker tolerance as a fraction of the contour perimeter.
pub const CONTOUR_EPSILON_RATIO: f64 = 0.005;

/// Decimal digits written for normalized label coordinates.
pub const LABEL_PRECISION: usize = 6;

/// Image file extensions accepted when scanning a folder (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
