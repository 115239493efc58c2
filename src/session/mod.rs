//! Labeling session: the editor plus everything that touches the filesystem.
//!
//! A [`Session`] owns the image folder, the class catalog, the save
//! directory and a current index per label type. It loads images and their
//! labels into the [`Editor`], writes labels back on save and on navigation,
//! and keeps the status line.
//!
//! Operations that fail with a [`SessionError`] leave the session as it was.
//! Precondition failures (nothing to save, already at the last image) are
//! not errors; they only set a transient status message.

mod action;
mod error;

pub use action::Action;
pub use error::SessionError;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::UserPreferences;
use crate::constants::BRUSH_SIZE_STEP;
use crate::dataset::{DisplayImage, ImageFolder};
use crate::editor::{CanvasEvent, Editor};
use crate::format::{LabelLayout, WriteReport, read_label_file, write_label_file};
use crate::model::{BoundingBox, ClassCatalog, LabelType, Polygon};
use crate::render::{Surface, render_frame};

/// Longest path shown in status messages before the middle is elided.
const MAX_DISPLAY_PATH: usize = 50;

/// An image with the persisted labels of one type, ready to show.
struct LoadedImage {
    image: DisplayImage,
    boxes: Vec<BoundingBox>,
    polygons: Vec<Polygon>,
}

/// Interactive labeling over a folder of images.
pub struct Session {
    editor: Editor,
    catalog: ClassCatalog,
    folder: Option<ImageFolder>,
    layout: Option<LabelLayout>,
    /// Current image index, tracked separately for each label type
    indices: HashMap<LabelType, usize>,
    image: Option<DisplayImage>,
    canvas_width: u32,
    canvas_height: u32,
    /// Transient message replacing the summary until the next input
    message: Option<String>,
}

impl Session {
    /// Create a session with no images loaded.
    pub fn new(catalog: ClassCatalog, preferences: &UserPreferences) -> Self {
        let mut editor = Editor::new(preferences.canvas_width, preferences.canvas_height)
            .with_scale_bounds(preferences.min_scale, preferences.max_scale)
            .with_brush_size(preferences.brush_size);
        editor.set_class(catalog.first_id().unwrap_or(0));

        Self {
            editor,
            catalog,
            folder: None,
            layout: None,
            indices: LabelType::all().iter().map(|lt| (*lt, 0)).collect(),
            image: None,
            canvas_width: preferences.canvas_width,
            canvas_height: preferences.canvas_height,
            message: None,
        }
    }

    /// Create a session and open an image folder and save directory.
    pub fn open(
        images: impl Into<PathBuf>,
        save_dir: impl Into<PathBuf>,
        catalog: ClassCatalog,
        preferences: &UserPreferences,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(catalog, preferences);
        session.set_save_dir(save_dir);
        session.open_folder(images)?;
        Ok(session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn image(&self) -> Option<&DisplayImage> {
        self.image.as_ref()
    }

    pub fn layout(&self) -> Option<&LabelLayout> {
        self.layout.as_ref()
    }

    pub fn label_type(&self) -> LabelType {
        self.editor.label_type()
    }

    /// Current image index of the active label type.
    pub fn current_index(&self) -> usize {
        self.index_of(self.label_type())
    }

    pub fn index_of(&self, label_type: LabelType) -> usize {
        self.indices.get(&label_type).copied().unwrap_or(0)
    }

    pub fn image_count(&self) -> usize {
        self.folder.as_ref().map_or(0, ImageFolder::len)
    }

    /// The transient message if one is pending, otherwise a summary of the
    /// current image, mode and class.
    pub fn status_line(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self.summary(),
        }
    }

    /// `image: <name> (<i>/<n>) | mode: <type> - <mode> | class: <id> (<name>) | shapes: <count>`
    pub fn summary(&self) -> String {
        let image = match &self.image {
            Some(image) => format!(
                "{} ({}/{})",
                image.name,
                self.current_index() + 1,
                self.image_count()
            ),
            None => "none".to_string(),
        };
        let class_id = self.editor.current_class();
        format!(
            "image: {} | mode: {} - {} | class: {} ({}) | shapes: {}",
            image,
            self.label_type().name(),
            self.editor.mode().name(),
            class_id,
            self.catalog.name(class_id),
            self.editor.shape_count()
        )
    }

    /// Draw the current frame.
    pub fn render(&self, surface: &mut dyn Surface) {
        render_frame(
            &self.editor,
            self.image.as_ref().map(|image| &image.pixels),
            &self.catalog,
            surface,
        );
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("Status: {}", message);
        self.message = Some(message);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Forward a canvas event to the editor.
    pub fn canvas(&mut self, event: CanvasEvent) {
        self.message = if self.image.is_some() {
            self.editor.update(event)
        } else {
            None
        };
    }

    /// Handle a discrete command.
    pub fn handle(&mut self, action: Action) -> Result<(), SessionError> {
        log::debug!("Action {:?}", action);
        self.message = None;

        match action {
            Action::ToggleLabelType => self.switch_label_type(self.label_type().toggled())?,
            Action::ToggleEdit => {
                let message = self.editor.toggle_edit();
                self.notify(message);
            }
            Action::ToggleDelete => {
                let message = self.editor.toggle_delete();
                self.notify(message);
            }
            Action::Save => self.save()?,
            Action::NextImage => self.navigate(true)?,
            Action::PreviousImage => self.navigate(false)?,
            Action::ResetView => {
                self.editor.reset_view();
                self.notify("View reset");
            }
            Action::SelectClass(id) => self.select_class(id),
            Action::BrushSmaller => {
                let size = self.editor.brush_size().saturating_sub(BRUSH_SIZE_STEP);
                self.set_brush_size(size);
            }
            Action::BrushLarger => {
                let size = self.editor.brush_size() + BRUSH_SIZE_STEP;
                self.set_brush_size(size);
            }
            Action::SetBrushSize(size) => self.set_brush_size(size),
        }
        Ok(())
    }

    fn select_class(&mut self, class_id: u32) {
        if self.catalog.contains(class_id) {
            self.editor.set_class(class_id);
            let message = format!(
                "Selected class: {} ({})",
                class_id,
                self.catalog.name(class_id)
            );
            self.notify(message);
        } else {
            self.notify(format!("Unknown class id {}", class_id));
        }
    }

    fn set_brush_size(&mut self, size: u32) {
        self.editor.set_brush_size(size);
        let message = format!("Brush size: {}", self.editor.brush_size());
        self.notify(message);
    }

    // =========================================================================
    // Folders
    // =========================================================================

    /// Point the session at another image folder, starting both label types
    /// at its first image.
    pub fn open_folder(&mut self, folder: impl Into<PathBuf>) -> Result<(), SessionError> {
        let folder = ImageFolder::scan(folder)?;
        let label_type = self.label_type();
        let loaded = self.load_entry(&folder, 0, label_type)?;

        self.folder = Some(folder);
        for index in self.indices.values_mut() {
            *index = 0;
        }
        self.show(loaded, 0, label_type);
        Ok(())
    }

    /// Change where labels are read from and written to. Labels already
    /// shown stay in the editor until the next load.
    pub fn set_save_dir(&mut self, save_dir: impl Into<PathBuf>) {
        let layout = LabelLayout::new(save_dir);
        let message = format!(
            "Save directory changed: {}",
            shorten_path(layout.root(), MAX_DISPLAY_PATH)
        );
        log::info!("Save directory set to {:?}", layout.root());
        self.layout = Some(layout);
        self.notify(message);
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Decode the image at `index` and read its labels of `label_type`
    /// without changing any session state.
    fn load_entry(
        &self,
        folder: &ImageFolder,
        index: usize,
        label_type: LabelType,
    ) -> Result<LoadedImage, SessionError> {
        let path = folder
            .path(index)
            .ok_or_else(|| SessionError::EmptyFolder(folder.folder().to_path_buf()))?;
        let image = DisplayImage::load(path, self.canvas_width, self.canvas_height)?;

        let mut loaded = LoadedImage {
            boxes: Vec::new(),
            polygons: Vec::new(),
            image,
        };

        if let Some(layout) = &self.layout {
            let label_path = layout.label_path(label_type, &loaded.image.name);
            let (w, h) = (loaded.image.width(), loaded.image.height());
            match label_type {
                LabelType::Box => loaded.boxes = read_label_file(&label_path, w, h)?,
                LabelType::Polygon => loaded.polygons = read_label_file(&label_path, w, h)?,
            }
        }

        Ok(loaded)
    }

    /// Commit a loaded image into the editor.
    fn show(&mut self, loaded: LoadedImage, index: usize, label_type: LabelType) {
        let LoadedImage {
            image,
            boxes,
            polygons,
        } = loaded;

        if self.editor.label_type() != label_type {
            self.editor.set_label_type(label_type);
        }
        self.editor.open_image(image.width(), image.height());
        self.editor.set_boxes(boxes);
        self.editor.set_polygons(polygons);
        self.indices.insert(label_type, index);

        let count = self.editor.shape_count();
        let message = if count > 0 {
            format!(
                "Loaded {}: {} existing labels ({})",
                image.name,
                count,
                label_type.folder()
            )
        } else {
            format!("Loaded {}: no existing labels ({})", image.name, label_type.folder())
        };
        self.image = Some(image);
        self.notify(message);
    }

    // =========================================================================
    // Label type, navigation and saving
    // =========================================================================

    /// Switch label type. Unsaved shapes of the type being left are dropped;
    /// the entered type resumes at its own index with labels from disk.
    pub fn switch_label_type(&mut self, label_type: LabelType) -> Result<(), SessionError> {
        if label_type == self.label_type() {
            return Ok(());
        }

        let Some(folder) = &self.folder else {
            self.editor.set_label_type(label_type);
            self.notify(format!("Label type: {}", label_type.name()));
            return Ok(());
        };

        let index = self.index_of(label_type).min(folder.len().saturating_sub(1));
        let loaded = self.load_entry(folder, index, label_type)?;
        log::info!("Switched to {} labeling at image {}", label_type.name(), index + 1);
        self.show(loaded, index, label_type);
        Ok(())
    }

    /// Move to the next or previous image, saving the current shapes first.
    pub fn navigate(&mut self, forward: bool) -> Result<(), SessionError> {
        if self.editor.has_shapes() {
            self.save()?;
        }

        let Some(folder) = &self.folder else {
            self.notify("No images loaded");
            return Ok(());
        };

        let current = self.current_index();
        let target = if forward {
            if current + 1 >= folder.len() {
                self.notify("Already at the last image");
                return Ok(());
            }
            current + 1
        } else {
            if current == 0 {
                self.notify("Already at the first image");
                return Ok(());
            }
            current - 1
        };

        let label_type = self.label_type();
        let loaded = self.load_entry(folder, target, label_type)?;
        self.show(loaded, target, label_type);
        Ok(())
    }

    /// Write the active type's shapes for the current image and copy the
    /// image next to them.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let label_type = self.label_type();
        if !self.editor.has_shapes() {
            let what = match label_type {
                LabelType::Box => "boxes",
                LabelType::Polygon => "polygons",
            };
            self.notify(format!("No {} to save", what));
            return Ok(());
        }

        let layout = self.layout.as_ref().ok_or(SessionError::NoSaveDirectory)?;
        let Some(image) = &self.image else {
            self.notify("No image loaded");
            return Ok(());
        };

        layout.ensure_dirs(label_type)?;
        let copy_path = layout.image_copy_path(label_type, &image.name);
        if copy_path != image.path {
            std::fs::copy(&image.path, &copy_path)?;
        }

        let label_path = layout.label_path(label_type, &image.name);
        let (w, h) = (image.width(), image.height());
        let report: WriteReport = match label_type {
            LabelType::Box => write_label_file(&label_path, self.editor.boxes(), w, h)?,
            LabelType::Polygon => write_label_file(&label_path, self.editor.polygons(), w, h)?,
        };

        let mut message = format!("Saved: {} ({})", image.name, label_type.folder());
        if report.has_skipped() {
            message.push_str(&format!(", {} invalid shapes skipped", report.skipped));
        }
        log::info!("{}", message);
        self.notify(message);
        Ok(())
    }
}

/// Shorten a long path for display by replacing its middle with `...`.
pub fn shorten_path(path: &Path, max_length: usize) -> String {
    let full = path.display().to_string();
    if full.chars().count() <= max_length {
        return full;
    }

    let parts: Vec<&str> = full.split(std::path::MAIN_SEPARATOR).collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return full;
    };
    if parts.len() <= 2 {
        return full;
    }

    let sep = std::path::MAIN_SEPARATOR;
    let budget = max_length.saturating_sub(first.chars().count() + last.chars().count() + 5);
    let start_len = first.chars().count().min(budget / 2);
    let end_len = last.chars().count().min(budget - start_len).max(1);

    let start: String = first.chars().take(start_len).collect();
    let end: String = last
        .chars()
        .skip(last.chars().count().saturating_sub(end_len))
        .collect();
    format!("{}{}...{}{}", start, sep, sep, end)
}
