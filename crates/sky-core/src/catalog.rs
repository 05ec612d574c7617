//! In-memory point-object catalog.
//!
//! A [`SkySubsystem`] for a fixed list of point objects (bright stars,
//! planets, deep-sky markers). Used by the headless runner and tests; real
//! renderers implement the trait themselves.

use bevy::math::{DQuat, DVec3};

use crate::subsystem::{Candidate, FrameSnapshot, ObjectRef, SkySubsystem, SubsystemKind};
use crate::view::{angular_separation, direction_from_az_alt};

/// Sidereal rotation rate of the sky, radians per simulated second.
pub const SIDEREAL_RATE: f64 = std::f64::consts::TAU / 86_164.090_5;

/// One catalog object.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    /// Direction at the catalog's reference instant.
    pub direction: DVec3,
    pub magnitude: f64,
    /// Field of view (degrees) used when zooming to this object.
    pub close_fov: f64,
    pub constellation: Option<String>,
}

impl CatalogEntry {
    /// Entry at azimuth/altitude given in degrees.
    pub fn at(id: impl Into<String>, azimuth_deg: f64, altitude_deg: f64, magnitude: f64) -> Self {
        Self {
            id: id.into(),
            direction: direction_from_az_alt(azimuth_deg.to_radians(), altitude_deg.to_radians()),
            magnitude,
            close_fov: 5.0,
            constellation: None,
        }
    }

    pub fn with_close_fov(mut self, fov: f64) -> Self {
        self.close_fov = fov;
        self
    }

    pub fn in_constellation(mut self, name: impl Into<String>) -> Self {
        self.constellation = Some(name.into());
        self
    }
}

/// Rotation of the whole catalog about the celestial pole.
#[derive(Debug, Clone, Copy)]
struct DiurnalMotion {
    pole: DVec3,
    /// Simulated instant at which entries sit at their catalog directions.
    epoch: Option<f64>,
}

/// Point-object subsystem.
#[derive(Debug, Clone)]
pub struct PointCatalog {
    kind: SubsystemKind,
    entries: Vec<CatalogEntry>,
    current: Vec<DVec3>,
    limiting_magnitude: f64,
    motion: Option<DiurnalMotion>,
    frames_rendered: u64,
    visible: usize,
}

impl PointCatalog {
    pub fn new(kind: SubsystemKind, entries: Vec<CatalogEntry>) -> Self {
        let current = entries.iter().map(|e| e.direction).collect();
        Self {
            kind,
            entries,
            current,
            limiting_magnitude: f64::INFINITY,
            motion: None,
            frames_rendered: 0,
            visible: 0,
        }
    }

    /// Objects fainter than `magnitude` are neither drawn nor picked.
    pub fn with_limiting_magnitude(mut self, magnitude: f64) -> Self {
        self.limiting_magnitude = magnitude;
        self
    }

    /// Rotates the sky about the pole of an observer at `latitude_deg`, at
    /// the sidereal rate of simulated time.
    pub fn with_diurnal_motion(mut self, latitude_deg: f64) -> Self {
        self.motion = Some(DiurnalMotion {
            pole: direction_from_az_alt(0.0, latitude_deg.to_radians()),
            epoch: None,
        });
        self
    }

    /// Moves an object. Takes effect immediately.
    pub fn set_direction(&mut self, id: &str, direction: DVec3) {
        if let Some(index) = self.index_of(id) {
            self.entries[index].direction = direction;
            self.current[index] = direction;
        }
    }

    /// Removes an object; references to it resolve to nothing afterwards.
    pub fn remove(&mut self, id: &str) {
        if let Some(index) = self.index_of(id) {
            self.entries.remove(index);
            self.current.remove(index);
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Objects inside the field of view at the last render.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn shown(&self, entry: &CatalogEntry) -> bool {
        entry.magnitude <= self.limiting_magnitude
    }
}

impl SkySubsystem for PointCatalog {
    fn kind(&self) -> SubsystemKind {
        self.kind
    }

    fn update(&mut self, frame: &FrameSnapshot) {
        let Some(motion) = &mut self.motion else {
            return;
        };
        let epoch = *motion.epoch.get_or_insert(frame.time.instant);
        // Positive about the pole in this frame: eastern objects rise.
        let rotation = DQuat::from_axis_angle(motion.pole, SIDEREAL_RATE * (frame.time.instant - epoch));
        for (current, entry) in self.current.iter_mut().zip(&self.entries) {
            *current = rotation * entry.direction;
        }
    }

    fn render(&mut self, frame: &FrameSnapshot) {
        self.frames_rendered += 1;

        let viewport = frame.viewport;
        let aspect = if viewport.height == 0 {
            1.0
        } else {
            f64::from(viewport.width) / f64::from(viewport.height)
        };
        // Half the diagonal field, close enough for a visibility count.
        let half_diagonal = (frame.view.fov.to_radians() / 2.0) * 1f64.hypot(aspect);
        let forward = frame.view.direction();

        self.visible = self
            .entries
            .iter()
            .zip(&self.current)
            .filter(|(entry, direction)| {
                self.shown(entry) && angular_separation(forward, **direction) <= half_diagonal
            })
            .count();
    }

    fn nearest(&self, direction: DVec3, _frame: &FrameSnapshot) -> Option<Candidate> {
        self.entries
            .iter()
            .zip(&self.current)
            .filter(|(entry, _)| self.shown(entry))
            .map(|(entry, current)| (entry, *current, angular_separation(direction, *current)))
            .min_by(|a, b| a.2.total_cmp(&b.2).then_with(|| a.0.id.cmp(&b.0.id)))
            .map(|(entry, current, separation)| Candidate {
                object: ObjectRef::new(self.kind, entry.id.clone()),
                direction: current,
                separation,
                score: separation,
            })
    }

    fn direction_of(&self, id: &str) -> Option<DVec3> {
        self.index_of(id).map(|index| self.current[index])
    }

    fn close_fov(&self, id: &str) -> Option<f64> {
        self.index_of(id).map(|index| self.entries[index].close_fov)
    }

    fn constellation_of(&self, object: &ObjectRef) -> Option<String> {
        if object.kind != self.kind {
            return None;
        }
        self.index_of(&object.id)
            .and_then(|index| self.entries[index].constellation.clone())
    }
}
