use crate::core::geo::Point;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Host input the controller reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Scroll wheel notch; positive zooms in about `position`
    Wheel { delta: f64, position: Point },
    /// Start of drag operation
    DragStart { position: Point },
    /// Drag in progress, absolute pointer position
    DragMove { position: Point },
    /// End of drag operation
    DragEnd,
    /// Canvas resized to the given size in screen pixels
    Resize { width: f64, height: f64 },
    /// Switch to another tile set
    RootChanged { root: PathBuf },
    /// Drop every cached tile and reload what is visible
    ClearCache,
}

impl InputEvent {
    /// Whether this event starts, continues or ends a drag gesture
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            InputEvent::DragStart { .. } | InputEvent::DragMove { .. } | InputEvent::DragEnd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_deserialize_from_host_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{ "Wheel": { "delta": -1.0, "position": { "x": 3.0, "y": 4.0 } } }"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Wheel {
                delta: -1.0,
                position: Point::new(3.0, 4.0)
            }
        );

        let event: InputEvent = serde_json::from_str(r#""ClearCache""#).unwrap();
        assert_eq!(event, InputEvent::ClearCache);
        assert!(!event.is_drag());
        assert!(InputEvent::DragEnd.is_drag());
    }
}
