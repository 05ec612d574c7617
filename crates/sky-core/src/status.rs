//! Read-only snapshot of core state for UI collaborators and pollers.

use serde::{Deserialize, Serialize};

use crate::config::DisplayToggles;
use crate::projector::Viewport;
use crate::selection::SelectionState;
use crate::time::TimeState;
use crate::view::ViewState;

/// Immutable view of the core after the latest `update`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoreStatus {
    pub frame: u64,
    pub fps: f64,
    pub time: TimeState,
    pub view: ViewState,
    pub selection: SelectionState,
    pub is_go_zoom_on_object: bool,
    pub is_animating: bool,
    pub tracking: bool,
    pub toggles: DisplayToggles,
    pub viewport: Viewport,
    /// Last pointer position reported through `handle_move`.
    pub cursor: Option<(f64, f64)>,
}

impl CoreStatus {
    /// True when the two snapshots differ in something other than the
    /// continuously changing fields (time, view, fps, frame).
    pub fn differs_discretely(&self, other: &Self) -> bool {
        self.selection != other.selection
            || self.is_go_zoom_on_object != other.is_go_zoom_on_object
            || self.is_animating != other.is_animating
            || self.tracking != other.tracking
            || self.toggles != other.toggles
            || self.viewport != other.viewport
            || self.time.paused != other.time.paused
            || self.time.nominal_rate() != other.time.nominal_rate()
    }
}
