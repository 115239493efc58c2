//! Discrete user commands.

use serde::{Deserialize, Serialize};

/// A command issued by a key press or a toolbar button.
///
/// Serialized in snake case: unit commands as plain strings
/// (`"toggle_edit"`), parameterized ones as single-key objects
/// (`{"select_class": 2}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Switch between box and polygon labeling
    ToggleLabelType,
    ToggleEdit,
    ToggleDelete,
    Save,
    NextImage,
    PreviousImage,
    /// Scale 1.0 and no pan
    ResetView,
    /// Make a class id current for new shapes
    SelectClass(u32),
    BrushSmaller,
    BrushLarger,
    SetBrushSize(u32),
}

impl Action {
    /// Short description for help output.
    pub fn description(&self) -> String {
        match self {
            Action::ToggleLabelType => "Toggle box/polygon labeling".to_string(),
            Action::ToggleEdit => "Toggle edit mode".to_string(),
            Action::ToggleDelete => "Toggle delete mode".to_string(),
            Action::Save => "Save labels".to_string(),
            Action::NextImage => "Next image".to_string(),
            Action::PreviousImage => "Previous image".to_string(),
            Action::ResetView => "Reset zoom and pan".to_string(),
            Action::SelectClass(id) => format!("Select class {}", id),
            Action::BrushSmaller => "Smaller brush".to_string(),
            Action::BrushLarger => "Larger brush".to_string(),
            Action::SetBrushSize(size) => format!("Brush size {}", size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json() {
        let action: Action = serde_json::from_str(r#""toggle_label_type""#).unwrap();
        assert_eq!(action, Action::ToggleLabelType);

        let action: Action = serde_json::from_str(r#"{"select_class": 4}"#).unwrap();
        assert_eq!(action, Action::SelectClass(4));

        assert_eq!(
            serde_json::to_string(&Action::NextImage).unwrap(),
            r#""next_image""#
        );
    }
}
