//! Renderable subsystem contract.
//!
//! Stars, nebulae, the solar system and the other categories of drawable
//! objects are collaborators owned by the core. Each one computes its own
//! positions, renders itself and answers nearest-object queries.

use bevy::math::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::DisplayToggles;
use crate::projector::Viewport;
use crate::selection::SelectionState;
use crate::time::TimeState;
use crate::view::ViewState;

/// Category of a renderable subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsystemKind {
    Atmosphere,
    Landscape,
    MilkyWay,
    Nebulae,
    Stars,
    SolarSystem,
    Constellations,
    Grids,
    Cardinals,
}

impl SubsystemKind {
    pub const ALL: [Self; 9] = [
        Self::Atmosphere,
        Self::Landscape,
        Self::MilkyWay,
        Self::Nebulae,
        Self::Stars,
        Self::SolarSystem,
        Self::Constellations,
        Self::Grids,
        Self::Cardinals,
    ];

    /// Draw layer of this kind.
    pub fn layer(self) -> RenderLayer {
        match self {
            Self::Atmosphere | Self::Landscape => RenderLayer::Background,
            Self::MilkyWay | Self::Nebulae => RenderLayer::DeepSky,
            Self::Stars => RenderLayer::Stars,
            Self::SolarSystem => RenderLayer::SolarSystem,
            Self::Constellations | Self::Grids | Self::Cardinals => RenderLayer::Overlay,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Atmosphere => "atmosphere",
            Self::Landscape => "landscape",
            Self::MilkyWay => "milky_way",
            Self::Nebulae => "nebulae",
            Self::Stars => "stars",
            Self::SolarSystem => "solar_system",
            Self::Constellations => "constellations",
            Self::Grids => "grids",
            Self::Cardinals => "cardinals",
        }
    }
}

/// Back-to-front draw layers. Declaration order is draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderLayer {
    Background,
    DeepSky,
    Stars,
    SolarSystem,
    Overlay,
}

/// Tagged reference to an object owned by a subsystem.
///
/// Resolved lazily through the owning subsystem, so it stays valid (as
/// "unknown") if that subsystem reloads its objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: SubsystemKind,
    pub id: String,
}

impl ObjectRef {
    pub fn new(kind: SubsystemKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.label(), self.id)
    }
}

/// A subsystem's answer to a nearest-object query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub object: ObjectRef,
    /// Current direction of the object.
    pub direction: DVec3,
    /// Angular separation from the query direction, in radians.
    pub separation: f64,
    /// Subsystem-specific proximity score; lower is better.
    pub score: f64,
}

/// Read-only state handed to subsystems each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub delta_ms: f64,
    pub time: TimeState,
    pub view: ViewState,
    pub selection: SelectionState,
    pub toggles: DisplayToggles,
    pub viewport: Viewport,
}

/// A renderable category of astronomical objects.
pub trait SkySubsystem: Send + Sync {
    fn kind(&self) -> SubsystemKind;

    /// Recomputes positions for the frame. Called during `update`.
    fn update(&mut self, _frame: &FrameSnapshot) {}

    /// Draws the subsystem. Called during `draw`, back to front.
    fn render(&mut self, frame: &FrameSnapshot);

    /// Nearest object to `direction` under this subsystem's own metric.
    fn nearest(&self, _direction: DVec3, _frame: &FrameSnapshot) -> Option<Candidate> {
        None
    }

    /// Current direction of the object with this id, if it still exists.
    fn direction_of(&self, _id: &str) -> Option<DVec3> {
        None
    }

    /// Field of view (degrees) that frames the object, for zoom-to.
    fn close_fov(&self, _id: &str) -> Option<f64> {
        None
    }

    /// Name of the constellation containing the object, if this subsystem
    /// knows constellation membership.
    fn constellation_of(&self, _object: &ObjectRef) -> Option<String> {
        None
    }
}
