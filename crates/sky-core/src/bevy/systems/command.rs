//! Command processing system.
//!
//! Every command acts on the core in queue order. Input commands go through
//! the same forwarding path as [`SkyInputEvent`] messages.

use bevy::prelude::*;

use crate::bevy::systems::input::forward_input;
use crate::bevy::{
    SkyClickEvent, SkyCommand, SkyCommandQueue, SkyCoreRes, SkyGoZoomEvent, SkyInputEvent,
    SkyKeyEvent, SkyMoveEvent, SkyResizeEvent,
};

/// System to process commands from the external command queue.
///
/// Handles commands until a Yield is encountered.
/// Commands after Yield are processed in the next frame.
pub fn process_sky_commands(command_queue: Res<SkyCommandQueue>, mut core: ResMut<SkyCoreRes>) {
    let core = &mut core.0;

    for command in command_queue.drain_until_yield() {
        match command {
            SkyCommand::Key { key, state } => {
                tracing::debug!("[command] Key {:?} {:?}", key, state);
                forward_input(core, &SkyInputEvent::from(SkyKeyEvent { key, state }));
            }
            SkyCommand::Click { x, y, state, button } => {
                tracing::debug!("[command] Click {:?} {:?} at ({x:.1}, {y:.1})", button, state);
                forward_input(
                    core,
                    &SkyInputEvent::from(SkyClickEvent { x, y, state, button }),
                );
            }
            SkyCommand::Move { x, y } => {
                forward_input(core, &SkyInputEvent::from(SkyMoveEvent { x, y }));
            }
            SkyCommand::Resize { width, height } => {
                tracing::info!("[command] Resize {width}x{height}");
                forward_input(core, &SkyInputEvent::from(SkyResizeEvent { width, height }));
            }
            SkyCommand::ToggleGoZoom { duration_secs } => {
                tracing::info!("[command] ToggleGoZoom");
                forward_input(core, &SkyInputEvent::from(SkyGoZoomEvent { duration_secs }));
            }
            SkyCommand::Select { object } => {
                tracing::info!("[command] Select {:?}", object);
                core.select(object);
            }
            SkyCommand::Goto { object, duration_secs } => {
                tracing::info!("[command] Goto {object} over {duration_secs}s");
                core.goto_object(&object, duration_secs);
            }
            SkyCommand::ZoomTo { object, duration_secs } => {
                tracing::info!("[command] ZoomTo {object} over {duration_secs}s");
                core.zoom_to_object(&object, duration_secs);
            }
            SkyCommand::SetTimeRate { rate } => {
                tracing::info!("[command] SetTimeRate {rate}");
                core.time_mut().set_rate(rate);
            }
            SkyCommand::SetInstant { instant } => {
                tracing::info!("[command] SetInstant {instant}");
                core.time_mut().set_instant(instant);
            }
            SkyCommand::SetToggles { toggles } => {
                tracing::info!("[command] SetToggles");
                *core.toggles_mut() = toggles;
            }
            // Yield is consumed by drain_until_yield(), should not reach here
            SkyCommand::Yield => {}
        }
    }
}
