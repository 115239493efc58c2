//! Annotation editor state machine.
//!
//! The [`Editor`] owns everything about the currently displayed image that
//! changes with input: the view transform, the shapes of both label types,
//! the active brush stroke and the edit selection. [`Editor::update`] is the
//! single transition function for canvas input; mode changes happen only
//! through the explicit toggle methods.
//!
//! The editor never touches the filesystem. Loading and saving shapes is the
//! session's job.

mod event;
mod mode;

pub use event::CanvasEvent;
pub use mode::{EditState, InteractionMode};

use crate::constants::{
    DEFAULT_BRUSH_SIZE, HANDLE_HIT_RADIUS, MAX_BRUSH_SIZE, MIN_BOX_SIZE, MIN_BRUSH_SIZE,
    VERTEX_HIT_RADIUS,
};
use crate::mask::BrushMask;
use crate::model::{BoundingBox, LabelType, Point, Polygon};
use crate::view::ViewTransform;

/// Interactive annotation state for one image.
#[derive(Debug, Clone)]
pub struct Editor {
    view: ViewTransform,
    image_width: u32,
    image_height: u32,
    boxes: Vec<BoundingBox>,
    polygons: Vec<Polygon>,
    label_type: LabelType,
    mode: InteractionMode,
    edit: EditState,
    current_class: u32,
    brush_size: u32,
    /// Mask of the stroke in progress, if any
    stroke: Option<BrushMask>,
    panning: bool,
    /// Canvas position of the last pointer event
    last_pointer: Option<(f32, f32)>,
}

impl Editor {
    /// Create an editor for a canvas with no image loaded yet.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            view: ViewTransform::new(canvas_width, canvas_height, 0, 0),
            image_width: 0,
            image_height: 0,
            boxes: Vec::new(),
            polygons: Vec::new(),
            label_type: LabelType::default(),
            mode: InteractionMode::default(),
            edit: EditState::Idle,
            current_class: 0,
            brush_size: DEFAULT_BRUSH_SIZE,
            stroke: None,
            panning: false,
            last_pointer: None,
        }
    }

    /// Restrict zoom to `[min_scale, max_scale]`.
    pub fn with_scale_bounds(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.view = self.view.with_scale_bounds(min_scale, max_scale);
        self
    }

    pub fn with_brush_size(mut self, size: u32) -> Self {
        self.set_brush_size(size);
        self
    }

    // =========================================================================
    // Image and shape loading
    // =========================================================================

    /// Show a new image: resets the view and drops all shapes and selection.
    pub fn open_image(&mut self, width: u32, height: u32) {
        let (min_scale, max_scale) = (self.view.min_scale, self.view.max_scale);
        self.view = ViewTransform::new(
            self.view.canvas_width as u32,
            self.view.canvas_height as u32,
            width,
            height,
        )
        .with_scale_bounds(min_scale, max_scale);
        self.image_width = width;
        self.image_height = height;
        self.clear_shapes();
        log::debug!("Editor opened {}x{} image", width, height);
    }

    /// Drop the shapes of both types along with any stroke or selection.
    pub fn clear_shapes(&mut self) {
        self.boxes.clear();
        self.polygons.clear();
        self.stroke = None;
        self.edit = EditState::Idle;
    }

    pub fn set_boxes(&mut self, boxes: Vec<BoundingBox>) {
        self.edit = EditState::Idle;
        self.boxes = boxes;
    }

    pub fn set_polygons(&mut self, polygons: Vec<Polygon>) {
        self.edit = EditState::Idle;
        self.polygons = polygons;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn current_class(&self) -> u32 {
        self.current_class
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Mask of the stroke being painted, if one is active.
    pub fn stroke(&self) -> Option<&BrushMask> {
        self.stroke.as_ref()
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Number of shapes of the active label type.
    pub fn shape_count(&self) -> usize {
        match self.label_type {
            LabelType::Box => self.boxes.len(),
            LabelType::Polygon => self.polygons.len(),
        }
    }

    pub fn has_shapes(&self) -> bool {
        self.shape_count() > 0
    }

    // =========================================================================
    // Explicit mode and setting changes
    // =========================================================================

    pub fn toggle_edit(&mut self) -> String {
        self.set_mode(self.mode.toggled_edit());
        match self.mode {
            InteractionMode::Edit => "Edit mode: ON (drag to move, handles to resize)".to_string(),
            _ => "Edit mode: OFF".to_string(),
        }
    }

    pub fn toggle_delete(&mut self) -> String {
        self.set_mode(self.mode.toggled_delete());
        match self.mode {
            InteractionMode::Delete => "Delete mode: ON".to_string(),
            _ => "Delete mode: OFF".to_string(),
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        log::debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.edit = EditState::Idle;
        self.stroke = None;
    }

    /// Switch the active label type. Shapes of both types are dropped; the
    /// caller reloads the entered type from disk.
    pub fn set_label_type(&mut self, label_type: LabelType) {
        log::debug!("Label type {:?} -> {:?}", self.label_type, label_type);
        self.label_type = label_type;
        self.clear_shapes();
    }

    pub fn set_class(&mut self, class_id: u32) {
        self.current_class = class_id;
    }

    /// Set the brush radius in image pixels, clamped to the allowed range.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    /// Scale 1.0, no pan.
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // =========================================================================
    // Canvas input
    // =========================================================================

    /// Apply one canvas event. Returns a status message when the event
    /// produced something worth reporting.
    pub fn update(&mut self, event: CanvasEvent) -> Option<String> {
        log::trace!("Canvas event {:?} in {:?}/{:?}", event, self.label_type, self.mode);

        let message = match event {
            CanvasEvent::PanStart => {
                self.start_pan();
                None
            }
            CanvasEvent::PanEnd => {
                self.panning = false;
                None
            }
            CanvasEvent::Wheel { delta, ctrl } => self.wheel(delta, ctrl),
            CanvasEvent::PointerMove { x, y } if self.panning => {
                if let Some((last_x, last_y)) = self.last_pointer {
                    self.view.pan_by(x - last_x, y - last_y);
                }
                None
            }
            // Presses and releases are ignored while panning
            CanvasEvent::PointerDown { .. } | CanvasEvent::PointerUp { .. } if self.panning => None,
            CanvasEvent::PointerDown { x, y } => self.pointer_down(self.view.to_image(x, y)),
            CanvasEvent::PointerMove { x, y } => self.pointer_move(self.view.to_image(x, y)),
            CanvasEvent::PointerUp { .. } => self.pointer_up(),
        };

        if let Some(pos) = event.position() {
            self.last_pointer = Some(pos);
        }
        message
    }

    fn start_pan(&mut self) {
        if self.stroke.take().is_some() {
            log::debug!("Pan started, stroke cancelled");
        }
        self.edit = EditState::Idle;
        self.panning = true;
    }

    fn wheel(&mut self, delta: f32, ctrl: bool) -> Option<String> {
        if !ctrl {
            return None;
        }
        if self.view.zoom(delta) {
            log::debug!("Zoom: {:.2}x", self.view.scale);
            Some(format!("Zoom: {:.1}x", self.view.scale))
        } else {
            None
        }
    }

    /// Smallest box side after an edit, in image pixels.
    fn min_box_size(&self) -> f32 {
        (MIN_BOX_SIZE / self.view.scale)
            .min(self.image_width as f32)
            .min(self.image_height as f32)
    }

    fn pointer_down(&mut self, p: Point) -> Option<String> {
        match (self.mode, self.label_type) {
            (InteractionMode::Drawing, _) => {
                let mut mask = BrushMask::new(self.image_width, self.image_height);
                mask.stamp(p, self.brush_size);
                self.stroke = Some(mask);
                None
            }
            (InteractionMode::Edit, LabelType::Box) => self.select_box(p),
            (InteractionMode::Edit, LabelType::Polygon) => {
                self.select_polygon(p);
                None
            }
            (InteractionMode::Delete, LabelType::Box) => {
                let index = self.boxes.iter().position(|b| b.contains(&p))?;
                self.boxes.remove(index);
                log::info!("Deleted box {}", index);
                Some(format!("Box {} deleted", index))
            }
            (InteractionMode::Delete, LabelType::Polygon) => {
                let index = self.polygons.iter().position(|poly| poly.contains(&p))?;
                self.polygons.remove(index);
                log::info!("Deleted polygon {}", index);
                Some(format!("Polygon {} deleted", index))
            }
        }
    }

    fn select_box(&mut self, p: Point) -> Option<String> {
        let radius = HANDLE_HIT_RADIUS / self.view.scale;
        let hit = self
            .boxes
            .iter()
            .enumerate()
            .find(|(_, b)| b.contains(&p))
            .map(|(index, b)| (index, b.hit_handle(&p, radius), b.class_id));

        match hit {
            Some((index, handle, class_id)) => {
                log::debug!("Selected box {} (handle {:?})", index, handle);
                self.edit = EditState::Box {
                    index,
                    handle,
                    anchor: p,
                };
                Some(format!("Box {} selected (class {})", index, class_id))
            }
            None => {
                self.edit = EditState::Idle;
                Some("Edit mode: select a box".to_string())
            }
        }
    }

    fn select_polygon(&mut self, p: Point) {
        // Vertices take priority over polygon interiors
        let vertex_hit = self
            .polygons
            .iter()
            .enumerate()
            .find_map(|(i, poly)| poly.vertex_at(&p, VERTEX_HIT_RADIUS).map(|v| (i, v)));

        self.edit = if let Some((polygon, vertex)) = vertex_hit {
            log::debug!("Selected vertex {} of polygon {}", vertex, polygon);
            EditState::Vertex { polygon, vertex }
        } else if let Some(index) = self.polygons.iter().position(|poly| poly.contains(&p)) {
            log::debug!("Selected polygon {}", index);
            EditState::Polygon { index, anchor: p }
        } else {
            EditState::Idle
        };
    }

    fn pointer_move(&mut self, p: Point) -> Option<String> {
        match self.edit {
            EditState::Box {
                index,
                handle,
                anchor,
            } => {
                let min_size = self.min_box_size();
                let (w, h) = (self.image_width as f32, self.image_height as f32);
                let b = self.boxes.get_mut(index)?;
                let (dx, dy) = (p.x - anchor.x, p.y - anchor.y);
                let message = match handle {
                    Some(handle) => {
                        b.resize(handle, dx, dy, min_size, w, h);
                        format!("Resizing box... ({}x{})", b.width() as i32, b.height() as i32)
                    }
                    None => {
                        b.translate_within(dx, dy, min_size, w, h);
                        format!("Moving box... ({},{})", b.x1 as i32, b.y1 as i32)
                    }
                };
                self.edit = EditState::Box {
                    index,
                    handle,
                    anchor: p,
                };
                Some(message)
            }
            EditState::Vertex { polygon, vertex } => {
                let point = self.polygons.get_mut(polygon)?.points.get_mut(vertex)?;
                *point = p;
                None
            }
            EditState::Polygon { index, anchor } => {
                self.polygons
                    .get_mut(index)?
                    .translate(p.x - anchor.x, p.y - anchor.y);
                self.edit = EditState::Polygon { index, anchor: p };
                None
            }
            EditState::Idle => {
                if let Some(mask) = self.stroke.as_mut() {
                    mask.stamp(p, self.brush_size);
                }
                None
            }
        }
    }

    fn pointer_up(&mut self) -> Option<String> {
        self.edit = EditState::Idle;
        let mask = self.stroke.take()?;
        if self.mode != InteractionMode::Drawing {
            return None;
        }

        match self.label_type {
            LabelType::Box => {
                let (x1, y1, x2, y2) = mask.bounding_rect()?;
                if x1 == x2 || y1 == y2 {
                    // A stroke clipped at the image border can leave a single row or column
                    return Some("Stroke too thin to create a box".to_string());
                }
                let bbox = BoundingBox::new(
                    x1 as f32,
                    y1 as f32,
                    x2 as f32,
                    y2 as f32,
                    self.current_class,
                );
                log::info!("Added box {:?}", bbox);
                self.boxes.push(bbox);
                Some(format!("New box added (class {})", self.current_class))
            }
            LabelType::Polygon => {
                if mask.is_empty() {
                    return None;
                }
                match mask.largest_outline() {
                    Some(points) => {
                        log::info!(
                            "Added polygon with {} vertices (class {})",
                            points.len(),
                            self.current_class
                        );
                        self.polygons.push(Polygon::new(points, self.current_class));
                        Some(format!("Polygon added (class {})", self.current_class))
                    }
                    None => Some("Not enough points to create a polygon".to_string()),
                }
            }
        }
    }
}
