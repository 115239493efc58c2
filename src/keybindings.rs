//! Customizable keybindings.
//!
//! Maps key characters to session [`Action`]s. Bindings are part of the
//! persisted configuration; missing entries fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::session::Action;

/// Maximum number of classes that can have hotkeys (keys 1-9).
pub const MAX_CLASS_HOTKEYS: usize = 9;

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub toggle_label_type: char,
    pub toggle_edit: char,
    pub toggle_delete: char,
    pub save: char,
    pub previous_image: char,
    pub next_image: char,
    pub reset_view: char,
    pub brush_smaller: char,
    pub brush_larger: char,

    /// Hotkeys for class selection; slot `i` selects class id `i`.
    /// None means no hotkey assigned for that slot
    pub class_hotkeys: [Option<char>; MAX_CLASS_HOTKEYS],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_label_type: 'w',
            toggle_edit: 'e',
            toggle_delete: 'r',
            save: 's',
            previous_image: 'a',
            next_image: 'd',
            reset_view: 'q',
            brush_smaller: '[',
            brush_larger: ']',

            // Default class hotkeys: 1-9 for class ids 0-8
            class_hotkeys: [
                Some('1'),
                Some('2'),
                Some('3'),
                Some('4'),
                Some('5'),
                Some('6'),
                Some('7'),
                Some('8'),
                Some('9'),
            ],
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn command_keys(&self) -> [(char, Action); 9] {
        [
            (self.toggle_label_type, Action::ToggleLabelType),
            (self.toggle_edit, Action::ToggleEdit),
            (self.toggle_delete, Action::ToggleDelete),
            (self.save, Action::Save),
            (self.previous_image, Action::PreviousImage),
            (self.next_image, Action::NextImage),
            (self.reset_view, Action::ResetView),
            (self.brush_smaller, Action::BrushSmaller),
            (self.brush_larger, Action::BrushLarger),
        ]
    }

    /// Get the action for a key press, if any. Letters match either case.
    pub fn action_for_key(&self, key: char) -> Option<Action> {
        let key = key.to_ascii_lowercase();

        if let Some((_, action)) = self
            .command_keys()
            .into_iter()
            .find(|(bound, _)| bound.to_ascii_lowercase() == key)
        {
            return Some(action);
        }

        self.class_hotkeys
            .iter()
            .position(|hotkey| hotkey.map(|k| k.to_ascii_lowercase()) == Some(key))
            .map(|slot| Action::SelectClass(slot as u32))
    }

    /// Every bound key with its action, commands first.
    pub fn bindings(&self) -> Vec<(char, Action)> {
        let mut all: Vec<(char, Action)> = self.command_keys().to_vec();
        all.extend(
            self.class_hotkeys
                .iter()
                .enumerate()
                .filter_map(|(slot, key)| key.map(|k| (k, Action::SelectClass(slot as u32)))),
        );
        all
    }
}
