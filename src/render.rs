//! Frame rendering.
//!
//! [`render_frame`] walks the editor state and issues draw calls on a
//! [`Surface`]. Everything handed to a surface is already in canvas
//! coordinates, so a surface never needs to know about zoom or pan.
//!
//! [`RasterSurface`] draws into an [`RgbImage`] with `imageproc`; it is what
//! the command line uses to write a preview of the final frame.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::editor::{Editor, InteractionMode};
use crate::model::{ClassCatalog, LabelType, Point, Polygon, ResizeHandle, class_color};

/// RGB color triple.
pub type Color = [u8; 3];

// ============================================================================
// Colors
// ============================================================================

pub const BACKGROUND_COLOR: Color = [229, 229, 229];
/// Every shape while delete mode is on
pub const DELETE_COLOR: Color = [255, 0, 0];
/// The shape being edited
pub const SELECTED_COLOR: Color = [255, 255, 0];
/// Unselected boxes in edit mode, and their handles
pub const EDIT_COLOR: Color = [0, 255, 255];
/// Handles of the selected box and the grabbed polygon vertex
pub const ACTIVE_HANDLE_COLOR: Color = [0, 0, 255];
pub const LABEL_COLOR: Color = [255, 0, 0];
pub const MASK_COLOR: Color = [0, 255, 0];
pub const MASK_ALPHA: f32 = 0.3;

/// Minimum handle radius in canvas pixels; grows with zoom.
const HANDLE_RADIUS: f32 = 4.0;
const VERTEX_RADIUS: f32 = 3.0;
/// Gap between a shape and its class label.
const LABEL_OFFSET: f32 = 10.0;

// ============================================================================
// Surface
// ============================================================================

/// A drawing target.
pub trait Surface {
    fn clear(&mut self, color: Color);

    /// Draw `image` with its top-left corner at `origin`, scaled by `scale`.
    fn draw_image(&mut self, image: &RgbImage, origin: (f32, f32), scale: f32);

    /// Blend `color` over every non-zero mask pixel. The mask is placed like
    /// an image with the same origin and scale.
    fn overlay_mask(
        &mut self,
        mask: &GrayImage,
        origin: (f32, f32),
        scale: f32,
        color: Color,
        alpha: f32,
    );

    fn stroke_rect(&mut self, min: (f32, f32), max: (f32, f32), color: Color);

    /// Closed outline through `points`.
    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Color);

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color);

    fn draw_text(&mut self, position: (f32, f32), text: &str, color: Color);
}

// ============================================================================
// Frame
// ============================================================================

/// Draw one frame of the editor: image, brush stroke, then the shapes of the
/// active label type with their class labels and edit decorations.
pub fn render_frame(
    editor: &Editor,
    image: Option<&RgbImage>,
    catalog: &ClassCatalog,
    surface: &mut dyn Surface,
) {
    surface.clear(BACKGROUND_COLOR);

    let view = editor.view();
    let origin = view.offset();
    if let Some(image) = image {
        surface.draw_image(image, origin, view.scale);
    }

    if let Some(mask) = editor.stroke() {
        // Contours are only traced on release, never per frame
        surface.overlay_mask(mask.pixels(), origin, view.scale, MASK_COLOR, MASK_ALPHA);
    }

    match editor.label_type() {
        LabelType::Box => render_boxes(editor, catalog, surface),
        LabelType::Polygon => render_polygons(editor, catalog, surface),
    }
}

fn class_tint(class_id: u32, catalog: &ClassCatalog) -> Color {
    catalog
        .get(class_id)
        .map(|category| category.color)
        .unwrap_or_else(|| class_color(class_id))
}

fn render_boxes(editor: &Editor, catalog: &ClassCatalog, surface: &mut dyn Surface) {
    let view = editor.view();
    let mode = editor.mode();
    let selected = editor.edit_state().selected_box();
    let handle_radius = HANDLE_RADIUS.max(HANDLE_RADIUS * view.scale);

    for (index, bbox) in editor.boxes().iter().enumerate() {
        let is_selected = selected == Some(index);
        let color = match mode {
            InteractionMode::Delete => DELETE_COLOR,
            InteractionMode::Edit if is_selected => SELECTED_COLOR,
            InteractionMode::Edit => EDIT_COLOR,
            InteractionMode::Drawing => class_tint(bbox.class_id, catalog),
        };

        let min = view.to_canvas(&Point::new(bbox.x1, bbox.y1));
        let max = view.to_canvas(&Point::new(bbox.x2, bbox.y2));
        surface.stroke_rect(min, max, color);
        surface.draw_text(
            (min.0, min.1 - LABEL_OFFSET),
            &bbox.class_id.to_string(),
            LABEL_COLOR,
        );

        if mode == InteractionMode::Edit {
            let handle_color = if is_selected {
                ACTIVE_HANDLE_COLOR
            } else {
                EDIT_COLOR
            };
            for handle in ResizeHandle::ALL {
                let center = view.to_canvas(&handle.anchor(bbox));
                surface.fill_circle(center, handle_radius, handle_color);
            }
        }
    }
}

fn render_polygons(editor: &Editor, catalog: &ClassCatalog, surface: &mut dyn Surface) {
    let view = editor.view();
    let mode = editor.mode();
    let selected = editor.edit_state().selected_polygon();

    for (index, polygon) in editor.polygons().iter().enumerate() {
        let grabbed_vertex = match selected {
            Some((selected_index, vertex)) if selected_index == index => Some(vertex),
            _ => None,
        };
        let color = match mode {
            InteractionMode::Delete => DELETE_COLOR,
            InteractionMode::Edit if grabbed_vertex.is_some() => SELECTED_COLOR,
            _ => class_tint(polygon.class_id, catalog),
        };

        let points = canvas_points(editor, polygon);
        surface.stroke_polygon(&points, color);
        if let Some(&(x, y)) = points.first() {
            surface.draw_text(
                (x, y - LABEL_OFFSET),
                &polygon.class_id.to_string(),
                LABEL_COLOR,
            );
        }

        if let Some(vertex) = grabbed_vertex {
            for (i, &point) in points.iter().enumerate() {
                let vertex_color = if vertex == Some(i) {
                    ACTIVE_HANDLE_COLOR
                } else {
                    SELECTED_COLOR
                };
                surface.fill_circle(point, VERTEX_RADIUS, vertex_color);
            }
        }
    }
}

fn canvas_points(editor: &Editor, polygon: &Polygon) -> Vec<(f32, f32)> {
    polygon
        .points
        .iter()
        .map(|p| editor.view().to_canvas(p))
        .collect()
}

// ============================================================================
// Raster surface
// ============================================================================

/// Software surface backed by an RGB image. Text is not drawn since no font
/// is bundled.
pub struct RasterSurface {
    canvas: RgbImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbImage::from_pixel(width, height, Rgb(BACKGROUND_COLOR)),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas
    }

    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        if width == 0 || height == 0 {
            return;
        }
        draw_hollow_rect_mut(
            &mut self.canvas,
            Rect::at(x, y).of_size(width, height),
            Rgb(color),
        );
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self, color: Color) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgb(color);
        }
    }

    fn draw_image(&mut self, image: &RgbImage, origin: (f32, f32), scale: f32) {
        let width = (image.width() as f32 * scale).round() as u32;
        let height = (image.height() as f32 * scale).round() as u32;
        if width == 0 || height == 0 {
            return;
        }

        let scaled = if (width, height) == image.dimensions() {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(image, width, height, FilterType::Triangle))
        };
        imageops::overlay(
            &mut self.canvas,
            &*scaled,
            origin.0.round() as i64,
            origin.1.round() as i64,
        );
    }

    fn overlay_mask(
        &mut self,
        mask: &GrayImage,
        origin: (f32, f32),
        scale: f32,
        color: Color,
        alpha: f32,
    ) {
        if scale <= 0.0 {
            return;
        }
        let (canvas_width, canvas_height) = self.canvas.dimensions();
        let x_start = origin.0.clamp(0.0, canvas_width as f32).floor() as u32;
        let y_start = origin.1.clamp(0.0, canvas_height as f32).floor() as u32;
        let x_end = (origin.0 + mask.width() as f32 * scale)
            .clamp(0.0, canvas_width as f32)
            .ceil() as u32;
        let y_end = (origin.1 + mask.height() as f32 * scale)
            .clamp(0.0, canvas_height as f32)
            .ceil() as u32;

        for cy in y_start..y_end {
            let my = ((cy as f32 + 0.5 - origin.1) / scale).floor();
            if my < 0.0 || my >= mask.height() as f32 {
                continue;
            }
            for cx in x_start..x_end {
                let mx = ((cx as f32 + 0.5 - origin.0) / scale).floor();
                if mx < 0.0 || mx >= mask.width() as f32 {
                    continue;
                }
                if mask.get_pixel(mx as u32, my as u32)[0] == 0 {
                    continue;
                }
                let pixel = self.canvas.get_pixel_mut(cx, cy);
                for (channel, tint) in pixel.0.iter_mut().zip(color) {
                    *channel = (*channel as f32 * (1.0 - alpha) + tint as f32 * alpha).round() as u8;
                }
            }
        }
    }

    fn stroke_rect(&mut self, min: (f32, f32), max: (f32, f32), color: Color) {
        let x = min.0.round() as i32;
        let y = min.1.round() as i32;
        let width = (max.0.round() as i32 - x).max(0) as u32 + 1;
        let height = (max.1.round() as i32 - y).max(0) as u32 + 1;

        // Two pixels wide
        self.rect(x, y, width, height, color);
        if width > 2 && height > 2 {
            self.rect(x + 1, y + 1, width - 2, height - 2, color);
        }
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 2 {
            return;
        }
        for (i, &start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            draw_line_segment_mut(&mut self.canvas, start, end, Rgb(color));
        }
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        draw_filled_circle_mut(
            &mut self.canvas,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round() as i32,
            Rgb(color),
        );
    }

    fn draw_text(&mut self, _position: (f32, f32), text: &str, _color: Color) {
        log::trace!("Raster surface skips text {:?}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::CanvasEvent;
    use crate::model::BoundingBox;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Image { origin: (f32, f32), scale: f32 },
        Mask,
        Rect { min: (f32, f32), max: (f32, f32), color: Color },
        Polygon { points: usize, color: Color },
        Circle { color: Color },
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl Surface for Recorder {
        fn clear(&mut self, _color: Color) {
            self.calls.push(Call::Clear);
        }
        fn draw_image(&mut self, _image: &RgbImage, origin: (f32, f32), scale: f32) {
            self.calls.push(Call::Image { origin, scale });
        }
        fn overlay_mask(&mut self, _: &GrayImage, _: (f32, f32), _: f32, _: Color, _: f32) {
            self.calls.push(Call::Mask);
        }
        fn stroke_rect(&mut self, min: (f32, f32), max: (f32, f32), color: Color) {
            self.calls.push(Call::Rect { min, max, color });
        }
        fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Color) {
            self.calls.push(Call::Polygon {
                points: points.len(),
                color,
            });
        }
        fn fill_circle(&mut self, _center: (f32, f32), _radius: f32, color: Color) {
            self.calls.push(Call::Circle { color });
        }
        fn draw_text(&mut self, _position: (f32, f32), text: &str, _color: Color) {
            self.calls.push(Call::Text(text.to_string()));
        }
    }

    fn catalog() -> ClassCatalog {
        ClassCatalog::from_pairs([(0, "normal"), (1, "scratch")])
    }

    // 200x100 image centered on an 800x600 canvas: offset (300, 250)
    fn editor_with_box() -> Editor {
        let mut editor = Editor::new(800, 600);
        editor.open_image(200, 100);
        editor.set_boxes(vec![BoundingBox::new(10.0, 10.0, 100.0, 90.0, 1)]);
        editor
    }

    fn render(editor: &Editor, image: Option<&RgbImage>) -> Recorder {
        let mut recorder = Recorder::default();
        render_frame(editor, image, &catalog(), &mut recorder);
        recorder
    }

    #[test]
    fn test_draw_mode_frame_order() {
        let editor = editor_with_box();
        let image = RgbImage::new(200, 100);
        let recorder = render(&editor, Some(&image));

        let class_color = catalog().get(1).map(|c| c.color).unwrap();
        assert_eq!(
            recorder.calls,
            vec![
                Call::Clear,
                Call::Image {
                    origin: (300.0, 250.0),
                    scale: 1.0
                },
                Call::Rect {
                    min: (310.0, 260.0),
                    max: (400.0, 340.0),
                    color: class_color
                },
                Call::Text("1".to_string()),
            ]
        );
    }

    #[test]
    fn test_delete_mode_is_red() {
        let mut editor = editor_with_box();
        editor.toggle_delete();
        let recorder = render(&editor, None);
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Rect { color, .. } if *color == DELETE_COLOR)),
            1
        );
        assert_eq!(recorder.count(|c| matches!(c, Call::Circle { .. })), 0);
    }

    #[test]
    fn test_edit_mode_handles_and_selection() {
        let mut editor = editor_with_box();
        editor.toggle_edit();

        let recorder = render(&editor, None);
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Rect { color, .. } if *color == EDIT_COLOR)),
            1
        );
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Circle { color } if *color == EDIT_COLOR)),
            8
        );

        // Grab the box body; it stays selected until release
        editor.update(CanvasEvent::PointerDown { x: 350.0, y: 300.0 });
        let recorder = render(&editor, None);
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Rect { color, .. } if *color == SELECTED_COLOR)),
            1
        );
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Circle { color } if *color == ACTIVE_HANDLE_COLOR)),
            8
        );
    }

    #[test]
    fn test_stroke_overlay_before_shapes() {
        let mut editor = editor_with_box();
        editor.update(CanvasEvent::PointerDown { x: 450.0, y: 300.0 });

        let recorder = render(&editor, None);
        let mask = recorder.calls.iter().position(|c| *c == Call::Mask);
        let rect = recorder
            .calls
            .iter()
            .position(|c| matches!(c, Call::Rect { .. }));
        assert!(mask.is_some());
        assert!(mask < rect);
    }

    #[test]
    fn test_polygon_stroke_draws_only_the_mask() {
        let mut editor = Editor::new(800, 600);
        editor.open_image(200, 100);
        editor.set_label_type(LabelType::Polygon);
        editor.update(CanvasEvent::PointerDown { x: 350.0, y: 300.0 });
        editor.update(CanvasEvent::PointerMove { x: 380.0, y: 320.0 });

        let recorder = render(&editor, None);
        assert_eq!(recorder.calls, vec![Call::Clear, Call::Mask]);
    }

    #[test]
    fn test_polygon_vertices_shown_while_grabbed() {
        let mut editor = Editor::new(800, 600);
        editor.open_image(200, 100);
        editor.set_label_type(LabelType::Polygon);
        editor.set_polygons(vec![Polygon::new(
            vec![
                Point::new(20.0, 10.0),
                Point::new(180.0, 10.0),
                Point::new(100.0, 90.0),
            ],
            0,
        )]);
        editor.toggle_edit();

        let recorder = render(&editor, None);
        assert_eq!(recorder.count(|c| matches!(c, Call::Circle { .. })), 0);
        assert_eq!(recorder.count(|c| *c == Call::Text("0".to_string())), 1);

        // Grab the first vertex
        editor.update(CanvasEvent::PointerDown { x: 320.0, y: 260.0 });
        let recorder = render(&editor, None);
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Polygon { points: 3, color } if *color == SELECTED_COLOR)),
            1
        );
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Circle { color } if *color == ACTIVE_HANDLE_COLOR)),
            1
        );
        assert_eq!(
            recorder.count(|c| matches!(c, Call::Circle { color } if *color == SELECTED_COLOR)),
            2
        );
    }

    #[test]
    fn test_raster_surface_draws_box() {
        let editor = editor_with_box();
        let image = RgbImage::from_pixel(200, 100, Rgb([10, 20, 30]));
        let mut surface = RasterSurface::new(800, 600);
        render_frame(&editor, Some(&image), &catalog(), &mut surface);

        let canvas = surface.into_image();
        let class_color = catalog().get(1).map(|c| c.color).unwrap();
        assert_eq!(canvas.get_pixel(0, 0), &Rgb(BACKGROUND_COLOR));
        assert_eq!(canvas.get_pixel(350, 300), &Rgb([10, 20, 30]));
        assert_eq!(canvas.get_pixel(310, 300), &Rgb(class_color));
        assert_eq!(canvas.get_pixel(311, 300), &Rgb(class_color));
    }

    #[test]
    fn test_raster_mask_blend() {
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, image::Luma([255]));

        let mut surface = RasterSurface::new(8, 8);
        surface.clear([0, 0, 0]);
        surface.overlay_mask(&mask, (0.0, 0.0), 2.0, [100, 200, 0], 0.5);

        let canvas = surface.image();
        assert_eq!(canvas.get_pixel(2, 2), &Rgb([50, 100, 0]));
        assert_eq!(canvas.get_pixel(3, 3), &Rgb([50, 100, 0]));
        assert_eq!(canvas.get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(4, 4), &Rgb([0, 0, 0]));
    }
}
