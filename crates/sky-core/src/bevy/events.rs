//! ECS messages for the sky core.
//!
//! Input travels as one [`SkyInputEvent`] message type so the core sees
//! keys, clicks, moves and resizes in the order they were written.

use bevy::prelude::*;

use crate::input::{ButtonState, KeyAction, MouseButton};
use crate::subsystem::ObjectRef;

/// Decoded key press or release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyKeyEvent {
    pub key: KeyAction,
    pub state: ButtonState,
}

/// Mouse button or wheel event at a screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyClickEvent {
    pub x: f64,
    pub y: f64,
    pub state: ButtonState,
    pub button: MouseButton,
}

/// Pointer moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyMoveEvent {
    pub x: f64,
    pub y: f64,
}

/// Viewport resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Request to toggle go/zoom on the selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkyGoZoomEvent {
    /// Transition length in seconds; the configured default when `None`.
    pub duration_secs: Option<f64>,
}

/// One input for the core.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum SkyInputEvent {
    Key(SkyKeyEvent),
    Click(SkyClickEvent),
    Move(SkyMoveEvent),
    Resize(SkyResizeEvent),
    GoZoom(SkyGoZoomEvent),
}

impl From<SkyKeyEvent> for SkyInputEvent {
    fn from(event: SkyKeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<SkyClickEvent> for SkyInputEvent {
    fn from(event: SkyClickEvent) -> Self {
        Self::Click(event)
    }
}

impl From<SkyMoveEvent> for SkyInputEvent {
    fn from(event: SkyMoveEvent) -> Self {
        Self::Move(event)
    }
}

impl From<SkyResizeEvent> for SkyInputEvent {
    fn from(event: SkyResizeEvent) -> Self {
        Self::Resize(event)
    }
}

impl From<SkyGoZoomEvent> for SkyInputEvent {
    fn from(event: SkyGoZoomEvent) -> Self {
        Self::GoZoom(event)
    }
}

/// Fired after a tick in which the selected object changed.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct SelectionChangedEvent {
    pub previous: Option<ObjectRef>,
    pub current: Option<ObjectRef>,
}
