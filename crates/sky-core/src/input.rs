//! Decoded input events accepted by the core.
//!
//! Device decoding happens in the host; only these semantic events reach
//! [`SkyCore`](crate::SkyCore).

use serde::{Deserialize, Serialize};

/// Press state of a key or mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == Self::Pressed
    }
}

/// Mouse buttons, with wheel notches as pseudo-buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
}

/// Semantic key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    TurnLeft,
    TurnRight,
    TurnUp,
    TurnDown,
    ZoomIn,
    ZoomOut,
    /// Go to and zoom on the selection, or return from it.
    ToggleGoZoom,
    /// Go to the selection without zooming.
    GotoSelected,
    TogglePause,
    TimeFaster,
    TimeSlower,
    RealTime,
    ClearSelection,
    ToggleTracking,
}

impl KeyAction {
    /// Actions that act while held rather than on release.
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::TurnLeft
                | Self::TurnRight
                | Self::TurnUp
                | Self::TurnDown
                | Self::ZoomIn
                | Self::ZoomOut
        )
    }
}
