//! Animated go-to / zoom-to transitions with toggle-back.
//!
//! The animator interpolates the view toward a target over a fixed duration.
//! Before the first outbound transition it snapshots the view into a
//! [`SavedView`]; that snapshot survives retargeting and is only consumed
//! when a return transition completes. Its presence is exactly the
//! "parked on a go-to target" flag.

use bevy::math::DVec3;
use serde::{Deserialize, Serialize};

use crate::view::{SavedView, ViewState, slerp};

/// Easing curve applied to normalized transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingType {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    ///
    /// Every curve is monotonic with `apply(0) == 0` and `apply(1) == 1`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Direction of an animation relative to the saved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Moving toward an object.
    Outbound,
    /// Moving back to the saved view.
    Returning,
}

/// An in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub from: ViewState,
    pub to: ViewState,
    pub elapsed_ms: f64,
    pub duration_ms: f64,
    pub kind: TransitionKind,
}

impl Animation {
    /// Normalized progress in `[0, 1]`. Non-positive durations are complete.
    pub fn progress(&self) -> f64 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Returns true if the animation has completed.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// View at the current progress.
    fn interpolate(&self, easing: EasingType) -> ViewState {
        if self.is_finished() {
            return self.to;
        }
        let t = easing.apply(self.progress());
        let direction = slerp(self.from.direction(), self.to.direction(), t);
        let fov = self.from.fov + (self.to.fov - self.from.fov) * t;
        ViewState::from_direction(direction, fov)
    }
}

/// Animator state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TransitionState {
    #[default]
    Idle,
    Animating(Animation),
}

/// Emitted by [`TransitionAnimator::step`] when an animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionFinished {
    /// Arrived at an object; the saved view is still held.
    Arrived,
    /// Back at the saved view, which has been discarded.
    Returned,
}

/// Runs go-to / zoom-to transitions and remembers where to return.
#[derive(Debug, Clone, Default)]
pub struct TransitionAnimator {
    state: TransitionState,
    saved: Option<SavedView>,
    easing: EasingType,
}

impl TransitionAnimator {
    pub fn new(easing: EasingType) -> Self {
        Self {
            state: TransitionState::Idle,
            saved: None,
            easing,
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn saved_view(&self) -> Option<&SavedView> {
        self.saved.as_ref()
    }

    /// True while parked on (or moving to or from) a go-to target.
    pub fn is_go_zoom_on_object(&self) -> bool {
        self.saved.is_some()
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, TransitionState::Animating(_))
    }

    /// Progress of the current animation, if any.
    pub fn progress(&self) -> Option<f64> {
        match &self.state {
            TransitionState::Animating(animation) => Some(animation.progress()),
            TransitionState::Idle => None,
        }
    }

    /// Starts turning toward `direction`, keeping the field of view.
    ///
    /// If an outbound animation is in flight its field of view target is kept,
    /// so a preceding `zoom_to` is not undone.
    pub fn goto(&mut self, view: &ViewState, tracking: bool, direction: DVec3, duration_ms: f64) {
        let fov = self.outbound_target().map_or(view.fov, |target| target.fov);
        self.start_outbound(view, tracking, ViewState::from_direction(direction, fov), duration_ms);
    }

    /// Starts zooming to `fov`, keeping the viewing direction.
    ///
    /// If an outbound animation is in flight its direction target is kept,
    /// so a preceding `goto` is not undone.
    pub fn zoom_to(&mut self, view: &ViewState, tracking: bool, fov: f64, duration_ms: f64) {
        let mut target = self.outbound_target().unwrap_or(*view);
        target.fov = fov;
        self.start_outbound(view, tracking, target, duration_ms);
    }

    /// Starts a combined go-to and zoom-to.
    pub fn go_zoom(
        &mut self,
        view: &ViewState,
        tracking: bool,
        direction: DVec3,
        fov: f64,
        duration_ms: f64,
    ) {
        self.start_outbound(view, tracking, ViewState::from_direction(direction, fov), duration_ms);
    }

    /// Starts animating back to the saved view.
    ///
    /// Returns the tracking flag that was active when the view was saved, or
    /// `None` when there is nothing to return to.
    pub fn toggle_back(&mut self, view: &ViewState, duration_ms: f64) -> Option<bool> {
        let saved = self.saved?;
        tracing::debug!("[transition] returning to saved view over {duration_ms} ms");
        self.start(view, saved.view, duration_ms, TransitionKind::Returning);
        Some(saved.was_tracking)
    }

    /// Stops an in-flight animation where it is. The saved view is kept.
    pub fn cancel(&mut self) {
        if self.is_animating() {
            tracing::debug!("[transition] cancelled");
            self.state = TransitionState::Idle;
        }
    }

    /// Advances the animation by `delta_ms` and writes the result into `view`.
    pub fn step(&mut self, delta_ms: f64, view: &mut ViewState) -> Option<TransitionFinished> {
        let TransitionState::Animating(animation) = &mut self.state else {
            return None;
        };

        animation.elapsed_ms += delta_ms.max(0.0);

        if !animation.is_finished() {
            *view = animation.interpolate(self.easing);
            return None;
        }

        *view = animation.to;
        let kind = animation.kind;
        self.state = TransitionState::Idle;

        match kind {
            TransitionKind::Outbound => {
                tracing::debug!("[transition] arrived");
                Some(TransitionFinished::Arrived)
            }
            TransitionKind::Returning => {
                self.saved = None;
                tracing::debug!("[transition] returned, saved view discarded");
                Some(TransitionFinished::Returned)
            }
        }
    }

    fn outbound_target(&self) -> Option<ViewState> {
        match &self.state {
            TransitionState::Animating(animation) if animation.kind == TransitionKind::Outbound => {
                Some(animation.to)
            }
            _ => None,
        }
    }

    fn start_outbound(&mut self, view: &ViewState, tracking: bool, target: ViewState, duration_ms: f64) {
        if self.saved.is_none() {
            self.saved = Some(SavedView {
                view: *view,
                was_tracking: tracking,
            });
        }
        self.start(view, target, duration_ms, TransitionKind::Outbound);
    }

    fn start(&mut self, view: &ViewState, target: ViewState, duration_ms: f64, kind: TransitionKind) {
        if self.is_animating() {
            tracing::debug!("[transition] retargeting in-flight animation");
        }
        // `view` is the live view, which already holds the interpolated
        // position of any in-flight animation.
        self.state = TransitionState::Animating(Animation {
            from: *view,
            to: target,
            elapsed_ms: 0.0,
            duration_ms,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::angular_separation;

    const EPS: f64 = 1e-9;

    fn run_to_end(animator: &mut TransitionAnimator, view: &mut ViewState, step_ms: f64) {
        for _ in 0..10_000 {
            if !animator.is_animating() {
                return;
            }
            animator.step(step_ms, view);
        }
        panic!("animation did not finish");
    }

    #[test]
    fn test_easing_functions() {
        assert!((EasingType::Linear.apply(0.5) - 0.5).abs() < 0.001);
        assert!((EasingType::EaseIn.apply(0.5) - 0.25).abs() < 0.001);
        assert!((EasingType::EaseOut.apply(0.5) - 0.75).abs() < 0.001);
        assert!((EasingType::EaseInOut.apply(0.5) - 0.5).abs() < 0.001);

        for easing in [
            EasingType::Linear,
            EasingType::EaseIn,
            EasingType::EaseOut,
            EasingType::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_goto_holds_fov_and_reaches_target() {
        let mut animator = TransitionAnimator::new(EasingType::EaseInOut);
        let mut view = ViewState::new(0.0, 0.2, 40.0);
        let target = ViewState::new(1.0, 0.5, 40.0);

        animator.goto(&view, false, target.direction(), 1000.0);
        assert!(animator.is_go_zoom_on_object());

        animator.step(500.0, &mut view);
        assert!(animator.is_animating());
        assert!((view.fov - 40.0).abs() < EPS);

        let finished = animator.step(500.0, &mut view);
        assert_eq!(finished, Some(TransitionFinished::Arrived));
        assert!(!animator.is_animating());
        assert!(animator.is_go_zoom_on_object());
        assert!(view.approx_eq(&target, EPS));
    }

    #[test]
    fn test_toggle_round_trip_restores_exact_view() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let home = ViewState::new(0.3, 0.1, 60.0);
        let mut view = home;

        animator.go_zoom(&view, true, ViewState::new(2.0, 0.8, 60.0).direction(), 5.0, 1000.0);
        run_to_end(&mut animator, &mut view, 16.0);
        assert!((view.fov - 5.0).abs() < EPS);

        let was_tracking = animator.toggle_back(&view, 1000.0);
        assert_eq!(was_tracking, Some(true));
        assert!(animator.is_go_zoom_on_object());

        run_to_end(&mut animator, &mut view, 16.0);
        assert_eq!(view, home);
        assert!(!animator.is_go_zoom_on_object());
        assert!(animator.saved_view().is_none());
    }

    #[test]
    fn test_retarget_keeps_original_saved_view() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let home = ViewState::new(0.0, 0.0, 60.0);
        let mut view = home;

        animator.goto(&view, false, ViewState::new(1.0, 0.0, 60.0).direction(), 1000.0);
        animator.step(300.0, &mut view);
        animator.goto(&view, false, ViewState::new(-1.0, 0.3, 60.0).direction(), 1000.0);
        assert_eq!(animator.progress(), Some(0.0));

        run_to_end(&mut animator, &mut view, 50.0);
        assert!(view.approx_eq(&ViewState::new(-1.0, 0.3, 60.0), EPS));

        animator.toggle_back(&view, 1000.0);
        run_to_end(&mut animator, &mut view, 50.0);
        assert_eq!(view, home);
    }

    #[test]
    fn test_zoom_during_goto_keeps_direction_target() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let mut view = ViewState::new(0.0, 0.0, 60.0);
        let target = ViewState::new(0.5, 0.2, 60.0);

        animator.goto(&view, false, target.direction(), 1000.0);
        animator.step(100.0, &mut view);
        animator.zoom_to(&view, false, 10.0, 1000.0);
        run_to_end(&mut animator, &mut view, 20.0);

        assert!(angular_separation(view.direction(), target.direction()) < EPS);
        assert!((view.fov - 10.0).abs() < EPS);
    }

    #[test]
    fn test_progress_monotonic() {
        let mut animator = TransitionAnimator::new(EasingType::EaseInOut);
        let mut view = ViewState::new(0.0, 0.0, 60.0);
        let target = ViewState::new(1.5, 0.6, 20.0);
        animator.go_zoom(&view, false, target.direction(), 20.0, 1000.0);

        let start = view.direction();
        let mut last_progress = 0.0;
        let mut last_separation = 0.0;
        while animator.is_animating() {
            animator.step(37.0, &mut view);
            let progress = animator.progress().unwrap_or(1.0);
            let separation = angular_separation(start, view.direction());
            assert!(progress >= last_progress);
            assert!(separation + EPS >= last_separation);
            last_progress = progress;
            last_separation = separation;
        }
        assert_eq!(view, ViewState::from_direction(target.direction(), 20.0));
    }

    #[test]
    fn test_zero_duration_completes_on_next_step() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let mut view = ViewState::new(0.0, 0.0, 60.0);
        let target = ViewState::new(1.0, 0.0, 60.0);

        animator.goto(&view, false, target.direction(), 0.0);
        assert!(animator.is_animating());

        let finished = animator.step(0.0, &mut view);
        assert_eq!(finished, Some(TransitionFinished::Arrived));
        assert!(view.approx_eq(&target, EPS));

        animator.toggle_back(&view, -5.0);
        animator.step(0.0, &mut view);
        assert_eq!(view, ViewState::new(0.0, 0.0, 60.0));
    }

    #[test]
    fn test_toggle_back_without_saved_view() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let view = ViewState::default();
        assert_eq!(animator.toggle_back(&view, 1000.0), None);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_cancel_keeps_saved_view() {
        let mut animator = TransitionAnimator::new(EasingType::Linear);
        let mut view = ViewState::default();
        animator.goto(&view, false, ViewState::new(1.0, 0.0, 60.0).direction(), 1000.0);
        animator.step(100.0, &mut view);
        animator.cancel();

        assert!(!animator.is_animating());
        assert!(animator.is_go_zoom_on_object());
    }
}
