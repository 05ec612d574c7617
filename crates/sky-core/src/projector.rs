//! Screen ⇄ direction projection.
//!
//! Screen coordinates are pixels with the origin at the top-left corner and
//! y pointing down. The field of view spans the viewport height.

use std::f64::consts::PI;

use bevy::math::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::view::{ViewState, angular_separation};

/// Widest field of view the perspective mode can represent, in degrees.
const MAX_PERSPECTIVE_FOV: f64 = 179.0;

/// Projection mode of [`SkyProjector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Gnomonic projection.
    #[default]
    Perspective,
    /// Equidistant azimuthal projection.
    Fisheye,
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= f64::from(self.width) && y <= f64::from(self.height)
    }
}

/// Camera/projection collaborator consulted by picking and rendering.
pub trait Projector: Send + Sync {
    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    /// Called once per frame after the view has been updated.
    fn update_view(&mut self, view: &ViewState);

    /// Direction seen at screen point `(x, y)`, or `None` when the point is
    /// outside the viewport or outside the projection's domain.
    fn unproject(&self, x: f64, y: f64) -> Option<DVec3>;

    /// Screen position of `direction`, or `None` when it cannot be shown.
    fn project(&self, direction: DVec3) -> Option<DVec2>;
}

/// Built-in projector for the local horizontal frame.
#[derive(Debug, Clone)]
pub struct SkyProjector {
    kind: ProjectionKind,
    viewport: Viewport,
    view: ViewState,
}

impl SkyProjector {
    pub fn new(kind: ProjectionKind, viewport: Viewport) -> Self {
        Self {
            kind,
            viewport,
            view: ViewState::default(),
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Pixels per unit tangent-plane distance (perspective) or per radian
    /// (fisheye).
    fn scale(&self) -> f64 {
        let half_height = f64::from(self.viewport.height) / 2.0;
        match self.kind {
            ProjectionKind::Perspective => {
                let half_fov = self.view.fov.min(MAX_PERSPECTIVE_FOV).to_radians() / 2.0;
                half_height / half_fov.tan()
            }
            ProjectionKind::Fisheye => half_height / (self.view.fov.to_radians() / 2.0),
        }
    }
}

impl Projector for SkyProjector {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn update_view(&mut self, view: &ViewState) {
        self.view = *view;
    }

    fn unproject(&self, x: f64, y: f64) -> Option<DVec3> {
        if self.viewport.is_empty() || !self.viewport.contains(x, y) {
            return None;
        }

        let center = self.viewport.center();
        let dx = x - center.x;
        let dy = center.y - y;
        let scale = self.scale();

        let forward = self.view.direction();
        let right = self.view.right();
        let up = self.view.up();

        match self.kind {
            ProjectionKind::Perspective => {
                let direction = forward + right * (dx / scale) + up * (dy / scale);
                direction.try_normalize()
            }
            ProjectionKind::Fisheye => {
                let radius = dx.hypot(dy);
                let theta = radius / scale;
                if theta > PI {
                    return None;
                }
                if radius == 0.0 {
                    return Some(forward);
                }
                let lateral = right * (dx / radius) + up * (dy / radius);
                (forward * theta.cos() + lateral * theta.sin()).try_normalize()
            }
        }
    }

    fn project(&self, direction: DVec3) -> Option<DVec2> {
        if self.viewport.is_empty() {
            return None;
        }
        let direction = direction.try_normalize()?;

        let center = self.viewport.center();
        let scale = self.scale();

        let forward = self.view.direction();
        let along_right = direction.dot(self.view.right());
        let along_up = direction.dot(self.view.up());

        let (sx, sy) = match self.kind {
            ProjectionKind::Perspective => {
                let depth = direction.dot(forward);
                if depth <= 0.0 {
                    return None;
                }
                (scale * along_right / depth, scale * along_up / depth)
            }
            ProjectionKind::Fisheye => {
                let theta = angular_separation(direction, forward);
                let lateral = along_right.hypot(along_up);
                if lateral == 0.0 {
                    if theta > PI / 2.0 {
                        return None;
                    }
                    (0.0, 0.0)
                } else {
                    let radius = scale * theta;
                    (radius * along_right / lateral, radius * along_up / lateral)
                }
            }
        };

        Some(DVec2::new(center.x + sx, center.y - sy))
    }
}
