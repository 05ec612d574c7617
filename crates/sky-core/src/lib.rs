//! Sky-Live Core Library
//!
//! View, time and selection orchestration for a real-time sky simulation.
//!
//! [`SkyCore`] owns the simulated clock, the observer's view and the set of
//! renderable subsystems, and drives one `update` → `draw` cycle per frame:
//! continuous keyboard navigation, animated go-to / zoom-to transitions that
//! can be toggled back to the exact prior view, and object picking against
//! the current projection.
//!
//! The [`bevy`](crate::bevy) module hosts the core inside a Bevy app.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod core;
pub mod fps;
pub mod input;
pub mod navigation;
pub mod picker;
pub mod projector;
pub mod selection;
pub mod status;
pub mod subsystem;
pub mod time;
pub mod transition;
pub mod ui;
pub mod view;

// Bevy integration
pub mod bevy;

pub use catalog::{CatalogEntry, PointCatalog};
pub use config::{
    ConfigError, DisplayToggles, NavigationConfig, PickerConfig, ProjectionConfig, SkyConfig,
    StartupTime, TimeConfig, TransitionConfig,
};
pub use crate::core::SkyCore;
pub use fps::FrameCounter;
pub use input::{ButtonState, KeyAction, MouseButton};
pub use navigation::{NavigationDeltas, NavigationIntegrator};
pub use picker::ObjectPicker;
pub use projector::{ProjectionKind, Projector, SkyProjector, Viewport};
pub use selection::SelectionState;
pub use status::CoreStatus;
pub use subsystem::{Candidate, FrameSnapshot, ObjectRef, RenderLayer, SkySubsystem, SubsystemKind};
pub use time::{TimeController, TimeState};
pub use transition::{EasingType, TransitionAnimator, TransitionFinished, TransitionState};
pub use ui::UiCollaborator;
pub use view::{SavedView, ViewState};
