//! Canvas input events.

use serde::{Deserialize, Serialize};

/// Pointer and wheel input in canvas coordinates.
///
/// Serialized with a `type` tag so recorded sessions can be replayed from
/// JSON, e.g. `{"type": "pointer_down", "x": 120.0, "y": 80.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Wheel step; only zooms while the control modifier is held.
    Wheel {
        delta: f32,
        #[serde(default)]
        ctrl: bool,
    },
    /// The pan key was pressed.
    PanStart,
    /// The pan key was released.
    PanEnd,
}

impl CanvasEvent {
    /// Canvas position carried by pointer events.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            CanvasEvent::PointerDown { x, y }
            | CanvasEvent::PointerMove { x, y }
            | CanvasEvent::PointerUp { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tagging() {
        let event: CanvasEvent =
            serde_json::from_str(r#"{"type": "pointer_down", "x": 12.0, "y": 4.5}"#).unwrap();
        assert_eq!(event, CanvasEvent::PointerDown { x: 12.0, y: 4.5 });
        assert_eq!(event.position(), Some((12.0, 4.5)));

        let event: CanvasEvent = serde_json::from_str(r#"{"type": "wheel", "delta": -1.0}"#).unwrap();
        assert_eq!(
            event,
            CanvasEvent::Wheel {
                delta: -1.0,
                ctrl: false
            }
        );

        let event: CanvasEvent = serde_json::from_str(r#"{"type": "pan_start"}"#).unwrap();
        assert_eq!(event, CanvasEvent::PanStart);
        assert_eq!(event.position(), None);
    }
}
