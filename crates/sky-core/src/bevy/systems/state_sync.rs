//! State synchronization systems.
//!
//! Syncs the core status to shared stores for UI access.

use bevy::prelude::*;

use crate::bevy::{SkyCoreRes, SkyStores};

/// System to sync core status to the status store.
///
/// Runs every frame after the tick.
pub fn sync_status_to_store(core: Res<SkyCoreRes>, stores: Res<SkyStores>) {
    stores.status.update(core.0.status());
}
