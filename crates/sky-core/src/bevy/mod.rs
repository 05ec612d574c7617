//! Bevy host integration for the sky core.
//!
//! `SkyCorePlugin` installs a [`SkyCore`](crate::SkyCore) as a resource,
//! forwards input messages and queued commands into it, ticks it from
//! `Time` every `Update`, and mirrors its status into shared stores that a
//! UI can poll without touching the ECS world.

pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use events::*;
pub use plugin::SkyCorePlugin;
pub use resources::*;
pub use state_store::{SkyStatusStore, SkyStores};
