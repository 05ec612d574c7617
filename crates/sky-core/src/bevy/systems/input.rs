//! Input forwarding system.

use bevy::prelude::*;

use crate::bevy::{SkyCoreRes, SkyInputEvent};
use crate::core::SkyCore;

/// Forwards input messages written by other systems into the core before it
/// ticks, in the order they were written.
pub fn apply_sky_input(mut core: ResMut<SkyCoreRes>, mut input_events: MessageReader<SkyInputEvent>) {
    for event in input_events.read() {
        forward_input(&mut core.0, event);
    }
}

/// Applies one input to the core.
pub(crate) fn forward_input(core: &mut SkyCore, event: &SkyInputEvent) {
    match *event {
        SkyInputEvent::Resize(resize) => core.set_screen_size(resize.width, resize.height),
        SkyInputEvent::Move(pointer) => {
            core.handle_move(pointer.x, pointer.y);
        }
        SkyInputEvent::Key(key) => {
            if !core.handle_key(key.key, key.state) {
                tracing::trace!("[input] key {:?} {:?} unused", key.key, key.state);
            }
        }
        SkyInputEvent::Click(click) => {
            core.handle_click(click.x, click.y, click.state, click.button);
        }
        SkyInputEvent::GoZoom(go_zoom) => {
            let duration = go_zoom
                .duration_secs
                .unwrap_or(core.config().transition.auto_move_duration);
            core.toggle_selected_object_go_zoom(duration);
        }
    }
}
