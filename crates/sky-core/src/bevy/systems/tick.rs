//! Frame tick systems.

use bevy::prelude::*;

use crate::bevy::{SelectionChangedEvent, SkyCoreRes};
use crate::subsystem::ObjectRef;

/// Runs one core `update` then `draw` with the frame's virtual delta.
pub fn tick_sky_core(time: Res<Time>, mut core: ResMut<SkyCoreRes>) {
    let delta_ms = time.delta_secs_f64() * 1000.0;
    core.0.update(delta_ms);
    core.0.draw(delta_ms);
}

/// Emits [`SelectionChangedEvent`] when the selected object differs from
/// the one seen at the previous tick.
pub fn detect_selection_change(
    core: Res<SkyCoreRes>,
    mut last: Local<Option<ObjectRef>>,
    mut events: MessageWriter<SelectionChangedEvent>,
) {
    let current = core.0.selection().object.clone();
    if current == *last {
        return;
    }

    tracing::debug!("[selection] {:?} -> {:?}", *last, current);
    let previous = std::mem::replace(&mut *last, current.clone());
    events.write(SelectionChangedEvent { previous, current });
}
