//! Object picking.
//!
//! Every enabled subsystem proposes its nearest candidate; the picker keeps
//! those within the pick angle and returns the best one under a total order
//! (score, subsystem priority, object id), so the result never depends on
//! subsystem registration order.

use std::cmp::Ordering;

use bevy::math::DVec3;

use crate::config::PickerConfig;
use crate::projector::Projector;
use crate::subsystem::{Candidate, FrameSnapshot, SkySubsystem, SubsystemKind};
use crate::view::angular_separation;

/// Resolves screen points and directions to the nearest object.
#[derive(Debug, Clone)]
pub struct ObjectPicker {
    /// Maximum angular separation in radians.
    max_angle: f64,
    priority: Vec<SubsystemKind>,
}

impl ObjectPicker {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            max_angle: config.max_pick_angle.to_radians(),
            priority: config.priority.clone(),
        }
    }

    /// Maximum pick separation in radians.
    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    /// Rank of a subsystem kind for tie-breaking; lower wins.
    ///
    /// Listed kinds come first in list order, the rest follow in declaration
    /// order.
    pub fn rank(&self, kind: SubsystemKind) -> usize {
        match self.priority.iter().position(|k| *k == kind) {
            Some(index) => index,
            None => {
                let declared = SubsystemKind::ALL
                    .iter()
                    .position(|k| *k == kind)
                    .unwrap_or(SubsystemKind::ALL.len());
                self.priority.len() + declared
            }
        }
    }

    /// Converts the screen point to a direction through `projector`, then
    /// picks in that direction.
    pub fn pick_by_screen_point(
        &self,
        x: f64,
        y: f64,
        projector: &dyn Projector,
        subsystems: &[Box<dyn SkySubsystem>],
        frame: &FrameSnapshot,
    ) -> Option<Candidate> {
        let Some(direction) = projector.unproject(x, y) else {
            tracing::debug!("[picker] ({x:.1}, {y:.1}) is not on the sky");
            return None;
        };
        self.pick_by_direction(direction, subsystems, frame)
    }

    /// Best candidate near `direction` among subsystems shown by the frame's
    /// display toggles.
    pub fn pick_by_direction(
        &self,
        direction: DVec3,
        subsystems: &[Box<dyn SkySubsystem>],
        frame: &FrameSnapshot,
    ) -> Option<Candidate> {
        let direction = direction.try_normalize()?;

        let best = subsystems
            .iter()
            .filter(|subsystem| frame.toggles.shows(subsystem.kind()))
            .filter_map(|subsystem| subsystem.nearest(direction, frame))
            .filter_map(|mut candidate| {
                candidate.separation = angular_separation(direction, candidate.direction);
                let in_range = candidate.separation <= self.max_angle;
                (in_range && candidate.score.is_finite()).then_some(candidate)
            })
            .min_by(|a, b| self.compare(a, b));

        match &best {
            Some(candidate) => tracing::debug!(
                "[picker] picked {} at {:.4} rad",
                candidate.object,
                candidate.separation
            ),
            None => tracing::debug!("[picker] nothing within {:.4} rad", self.max_angle),
        }

        best
    }

    fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        a.score
            .total_cmp(&b.score)
            .then_with(|| self.rank(a.object.kind).cmp(&self.rank(b.object.kind)))
            .then_with(|| a.object.id.cmp(&b.object.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayToggles;
    use crate::projector::Viewport;
    use crate::selection::SelectionState;
    use crate::subsystem::ObjectRef;
    use crate::time::TimeState;
    use crate::view::{ViewState, direction_from_az_alt};

    /// Subsystem proposing one fixed candidate.
    struct Fixed {
        kind: SubsystemKind,
        id: &'static str,
        direction: DVec3,
        score: f64,
    }

    impl SkySubsystem for Fixed {
        fn kind(&self) -> SubsystemKind {
            self.kind
        }

        fn render(&mut self, _frame: &FrameSnapshot) {}

        fn nearest(&self, direction: DVec3, _frame: &FrameSnapshot) -> Option<Candidate> {
            Some(Candidate {
                object: ObjectRef::new(self.kind, self.id),
                direction: self.direction,
                separation: angular_separation(direction, self.direction),
                score: self.score,
            })
        }
    }

    fn fixed(kind: SubsystemKind, id: &'static str, az_deg: f64, score: f64) -> Box<dyn SkySubsystem> {
        Box::new(Fixed {
            kind,
            id,
            direction: direction_from_az_alt(az_deg.to_radians(), 0.0),
            score,
        })
    }

    fn frame() -> FrameSnapshot {
        FrameSnapshot {
            delta_ms: 0.0,
            time: TimeState::default(),
            view: ViewState::default(),
            selection: SelectionState::default(),
            toggles: DisplayToggles::default(),
            viewport: Viewport::new(800, 600),
        }
    }

    #[test]
    fn test_lowest_score_wins() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        let subsystems = vec![
            fixed(SubsystemKind::Stars, "vega", 1.0, 0.5),
            fixed(SubsystemKind::Nebulae, "m57", 2.0, 0.1),
        ];

        let picked = picker
            .pick_by_direction(DVec3::X, &subsystems, &frame())
            .unwrap();
        assert_eq!(picked.object, ObjectRef::new(SubsystemKind::Nebulae, "m57"));
    }

    #[test]
    fn test_tie_broken_by_priority_then_id() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        let subsystems = vec![
            fixed(SubsystemKind::Stars, "a", 1.0, 0.2),
            fixed(SubsystemKind::SolarSystem, "mars", 1.0, 0.2),
            fixed(SubsystemKind::Nebulae, "m1", 1.0, 0.2),
        ];
        let picked = picker
            .pick_by_direction(DVec3::X, &subsystems, &frame())
            .unwrap();
        assert_eq!(picked.object.kind, SubsystemKind::SolarSystem);

        let same_kind = vec![
            fixed(SubsystemKind::Stars, "b", 1.0, 0.2),
            fixed(SubsystemKind::Stars, "a", 1.0, 0.2),
        ];
        let picked = picker
            .pick_by_direction(DVec3::X, &same_kind, &frame())
            .unwrap();
        assert_eq!(picked.object.id, "a");
    }

    #[test]
    fn test_registration_order_irrelevant() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        let forward = vec![
            fixed(SubsystemKind::Stars, "a", 1.0, 0.2),
            fixed(SubsystemKind::Nebulae, "m1", 1.0, 0.2),
        ];
        let reversed = vec![
            fixed(SubsystemKind::Nebulae, "m1", 1.0, 0.2),
            fixed(SubsystemKind::Stars, "a", 1.0, 0.2),
        ];
        let a = picker.pick_by_direction(DVec3::X, &forward, &frame()).unwrap();
        let b = picker.pick_by_direction(DVec3::X, &reversed, &frame()).unwrap();
        assert_eq!(a.object, b.object);
    }

    #[test]
    fn test_candidates_beyond_max_angle_discarded() {
        let picker = ObjectPicker::new(&PickerConfig {
            max_pick_angle: 5.0,
            ..PickerConfig::default()
        });
        assert!((picker.max_angle() - 5f64.to_radians()).abs() < 1e-15);
        let subsystems = vec![fixed(SubsystemKind::Stars, "far", 10.0, 0.0)];
        assert!(picker.pick_by_direction(DVec3::X, &subsystems, &frame()).is_none());
    }

    #[test]
    fn test_hidden_subsystem_not_picked() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        let subsystems = vec![
            fixed(SubsystemKind::Stars, "vega", 1.0, 0.1),
            fixed(SubsystemKind::Nebulae, "m57", 1.0, 0.5),
        ];
        let mut frame = frame();
        frame.toggles.stars = false;

        let picked = picker.pick_by_direction(DVec3::X, &subsystems, &frame).unwrap();
        assert_eq!(picked.object.kind, SubsystemKind::Nebulae);
    }

    #[test]
    fn test_unlisted_kinds_rank_after_listed() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        assert!(picker.rank(SubsystemKind::Stars) < picker.rank(SubsystemKind::Atmosphere));
        assert!(picker.rank(SubsystemKind::Atmosphere) < picker.rank(SubsystemKind::Cardinals));
    }

    #[test]
    fn test_zero_direction_is_none() {
        let picker = ObjectPicker::new(&PickerConfig::default());
        let subsystems = vec![fixed(SubsystemKind::Stars, "a", 0.0, 0.0)];
        assert!(picker.pick_by_direction(DVec3::ZERO, &subsystems, &frame()).is_none());
    }
}
