//! Label types: which kind of shape is being annotated.

use serde::{Deserialize, Serialize};

/// The kind of shape the editor currently creates, edits and persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    /// Axis-aligned bounding boxes
    #[default]
    Box,
    /// Closed polygons
    Polygon,
}

impl LabelType {
    /// Get the display name for this label type.
    pub fn name(&self) -> &'static str {
        match self {
            LabelType::Box => "Box",
            LabelType::Polygon => "Polygon",
        }
    }

    /// Folder under the save directory holding this type's output.
    pub fn folder(&self) -> &'static str {
        match self {
            LabelType::Box => "bounding",
            LabelType::Polygon => "poly",
        }
    }

    /// The other label type.
    pub fn toggled(&self) -> LabelType {
        match self {
            LabelType::Box => LabelType::Polygon,
            LabelType::Polygon => LabelType::Box,
        }
    }

    pub fn all() -> &'static [LabelType] {
        &[LabelType::Box, LabelType::Polygon]
    }
}
