//! ECS resources for the sky core.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::config::DisplayToggles;
use crate::core::SkyCore;
use crate::input::{ButtonState, KeyAction, MouseButton};
use crate::subsystem::ObjectRef;

/// The sky core, owned by the ECS world.
#[derive(Resource, Debug)]
pub struct SkyCoreRes(pub SkyCore);

/// Commands pushed from outside the ECS (UI bindings, scripts).
#[derive(Debug, Clone, PartialEq)]
pub enum SkyCommand {
    Key { key: KeyAction, state: ButtonState },
    Click { x: f64, y: f64, state: ButtonState, button: MouseButton },
    Move { x: f64, y: f64 },
    Resize { width: u32, height: u32 },
    /// Toggle go/zoom on the selection.
    ToggleGoZoom { duration_secs: Option<f64> },
    Select { object: Option<ObjectRef> },
    Goto { object: ObjectRef, duration_secs: f64 },
    ZoomTo { object: ObjectRef, duration_secs: f64 },
    SetTimeRate { rate: f64 },
    SetInstant { instant: f64 },
    SetToggles { toggles: DisplayToggles },
    /// Defers the remaining commands to the next frame.
    Yield,
}

/// Thread-safe command queue.
///
/// Cloned handles share one queue; commands are drained by
/// `process_sky_commands` on the next frame.
#[derive(Resource, Clone, Debug)]
pub struct SkyCommandQueue {
    inner: Arc<Mutex<VecDeque<SkyCommand>>>,
}

impl SkyCommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: SkyCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain commands until Yield or empty.
    ///
    /// Yield itself is consumed but not returned; everything after it stays
    /// queued for the next frame.
    pub fn drain_until_yield(&self) -> Vec<SkyCommand> {
        let mut guard = self.inner.lock();
        let mut commands = Vec::new();

        while let Some(command) = guard.pop_front() {
            if matches!(command, SkyCommand::Yield) {
                tracing::debug!("[command] Yield - deferring remaining commands to next frame");
                break;
            }
            commands.push(command);
        }

        commands
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for SkyCommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
