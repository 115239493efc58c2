//! Interaction mode and in-progress edit state.

use serde::{Deserialize, Serialize};

use crate::model::{Point, ResizeHandle};

/// What a pointer press does on the canvas.
///
/// A single tagged value, so "edit and delete at once" cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Brush strokes create new shapes
    #[default]
    Drawing,
    /// Presses select shapes, drags move or resize them
    Edit,
    /// Presses remove the shape under the pointer
    Delete,
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Drawing => "Draw",
            InteractionMode::Edit => "Edit",
            InteractionMode::Delete => "Delete",
        }
    }

    /// Mode after pressing the edit toggle.
    pub fn toggled_edit(self) -> Self {
        match self {
            InteractionMode::Edit => InteractionMode::Drawing,
            _ => InteractionMode::Edit,
        }
    }

    /// Mode after pressing the delete toggle.
    pub fn toggled_delete(self) -> Self {
        match self {
            InteractionMode::Delete => InteractionMode::Drawing,
            _ => InteractionMode::Delete,
        }
    }
}

/// Selection and drag state while in edit mode.
///
/// Anchors are the image-space pointer position of the previous event; every
/// drag step applies the delta from the anchor and then advances it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A box is selected, optionally grabbed by one of its handles.
    Box {
        index: usize,
        handle: Option<ResizeHandle>,
        anchor: Point,
    },
    /// A single polygon vertex follows the pointer.
    Vertex { polygon: usize, vertex: usize },
    /// A whole polygon is being translated.
    Polygon { index: usize, anchor: Point },
}

impl EditState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    /// Index of the selected box, if any.
    pub fn selected_box(&self) -> Option<usize> {
        match self {
            EditState::Box { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Index of the selected polygon and, for vertex drags, the vertex.
    pub fn selected_polygon(&self) -> Option<(usize, Option<usize>)> {
        match self {
            EditState::Vertex { polygon, vertex } => Some((*polygon, Some(*vertex))),
            EditState::Polygon { index, .. } => Some((*index, None)),
            _ => None,
        }
    }
}
