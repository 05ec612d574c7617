//! Frame orchestrator.
//!
//! `SkyCore` owns the time controller, the live view, navigation, the
//! transition animator, the picker and every collaborator. One tick is one
//! `update` followed by one `draw`.

use bevy::math::DVec3;

use crate::config::{ConfigError, DisplayToggles, SkyConfig};
use crate::fps::FrameCounter;
use crate::input::{ButtonState, KeyAction, MouseButton};
use crate::navigation::NavigationIntegrator;
use crate::picker::ObjectPicker;
use crate::projector::{Projector, SkyProjector, Viewport};
use crate::selection::SelectionState;
use crate::status::CoreStatus;
use crate::subsystem::{Candidate, FrameSnapshot, ObjectRef, SkySubsystem, SubsystemKind};
use crate::time::TimeController;
use crate::transition::{TransitionAnimator, TransitionFinished};
use crate::ui::UiCollaborator;
use crate::view::ViewState;

/// Central orchestrator of the sky simulation.
pub struct SkyCore {
    config: SkyConfig,
    toggles: DisplayToggles,
    time: TimeController,
    view: ViewState,
    navigation: NavigationIntegrator,
    transition: TransitionAnimator,
    picker: ObjectPicker,
    selection: SelectionState,
    projector: Box<dyn Projector>,
    /// Sorted back to front; at most one per kind.
    subsystems: Vec<Box<dyn SkySubsystem>>,
    ui: Option<Box<dyn UiCollaborator>>,
    frames: FrameCounter,
    cursor: Option<(f64, f64)>,
}

impl std::fmt::Debug for SkyCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyCore")
            .field("view", &self.view)
            .field("time", self.time.state())
            .field("selection", &self.selection)
            .field("subsystems", &self.subsystems.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl SkyCore {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Validates `config` and builds a core around `projector`.
    pub fn new(config: SkyConfig, projector: Box<dyn Projector>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, projector))
    }

    /// Builds a core with the built-in [`SkyProjector`].
    pub fn with_default_projector(config: SkyConfig) -> Result<Self, ConfigError> {
        let projection = &config.projection;
        let projector = SkyProjector::new(
            projection.kind,
            Viewport::new(projection.width, projection.height),
        );
        Self::new(config, Box::new(projector))
    }

    /// Builds a core from an already validated configuration.
    pub(crate) fn assemble(config: SkyConfig, mut projector: Box<dyn Projector>) -> Self {
        let nav = &config.navigation;
        let view = ViewState::new(
            nav.init_azimuth.to_radians(),
            nav.init_altitude.to_radians(),
            nav.init_fov,
        );

        projector.set_viewport(Viewport::new(config.projection.width, config.projection.height));
        projector.update_view(&view);

        let core = Self {
            toggles: config.display,
            time: TimeController::from_config(&config.time),
            view,
            navigation: NavigationIntegrator::new(&config.navigation),
            transition: TransitionAnimator::new(config.transition.easing),
            picker: ObjectPicker::new(&config.picker),
            selection: SelectionState::default(),
            projector,
            subsystems: Vec::new(),
            ui: None,
            frames: FrameCounter::new(),
            cursor: None,
            config,
        };

        tracing::info!(
            "[sky] core initialized: fov={:.2} instant={:.1} rate={}",
            core.view.fov,
            core.time.instant(),
            core.time.state().nominal_rate()
        );
        core
    }

    /// Registers a subsystem, replacing any existing one of the same kind.
    pub fn add_subsystem(&mut self, subsystem: Box<dyn SkySubsystem>) {
        let kind = subsystem.kind();
        if let Some(existing) = self.subsystems.iter_mut().find(|s| s.kind() == kind) {
            tracing::info!("[sky] replacing subsystem {}", kind.label());
            *existing = subsystem;
            return;
        }

        tracing::info!("[sky] adding subsystem {}", kind.label());
        self.subsystems.push(subsystem);
        self.subsystems
            .sort_by_key(|s| (s.kind().layer(), s.kind()));
    }

    pub fn remove_subsystem(&mut self, kind: SubsystemKind) -> Option<Box<dyn SkySubsystem>> {
        let index = self.subsystems.iter().position(|s| s.kind() == kind)?;
        tracing::info!("[sky] removing subsystem {}", kind.label());
        Some(self.subsystems.remove(index))
    }

    pub fn subsystem(&self, kind: SubsystemKind) -> Option<&dyn SkySubsystem> {
        self.subsystems
            .iter()
            .find(|s| s.kind() == kind)
            .map(Box::as_ref)
    }

    /// Registered kinds in draw order.
    pub fn subsystem_kinds(&self) -> Vec<SubsystemKind> {
        self.subsystems.iter().map(|s| s.kind()).collect()
    }

    pub fn set_ui(&mut self, ui: Box<dyn UiCollaborator>) {
        self.ui = Some(ui);
    }

    // ========================================================================
    // Frame cycle
    // ========================================================================

    /// Advances the simulation by `delta_ms` wall-clock milliseconds.
    pub fn update(&mut self, delta_ms: f64) {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            tracing::warn!("[sky] ignoring non-finite frame delta {delta_ms}");
            0.0
        };

        self.time.advance(delta_ms);

        // Manual turning takes the view away from any automatic motion.
        if self.navigation.is_turning() {
            if self.navigation.tracking {
                tracing::debug!("[sky] tracking stopped by manual motion");
                self.navigation.tracking = false;
            }
            self.transition.cancel();
        }
        self.navigation.integrate(delta_ms, &mut self.view);

        self.follow_selection();

        if let Some(finished) = self.transition.step(delta_ms, &mut self.view) {
            match finished {
                TransitionFinished::Arrived => tracing::debug!("[sky] arrived at target"),
                TransitionFinished::Returned => tracing::debug!("[sky] returned to saved view"),
            }
        }

        self.projector.update_view(&self.view);

        let frame = self.frame_snapshot(delta_ms);
        for subsystem in &mut self.subsystems {
            subsystem.update(&frame);
        }

        self.frames.tick(delta_ms);

        if self.ui.is_some() {
            let status = self.status();
            if let Some(ui) = self.ui.as_mut() {
                ui.update(delta_ms, &status);
            }
        }
    }

    /// Renders every shown subsystem back to front, then the UI.
    pub fn draw(&mut self, delta_ms: f64) {
        let frame = self.frame_snapshot(delta_ms);
        for subsystem in &mut self.subsystems {
            if frame.toggles.shows(subsystem.kind()) {
                subsystem.render(&frame);
            }
        }

        if self.ui.is_some() {
            let status = self.status();
            if let Some(ui) = self.ui.as_mut() {
                ui.draw(&status);
            }
        }
    }

    fn frame_snapshot(&self, delta_ms: f64) -> FrameSnapshot {
        FrameSnapshot {
            delta_ms,
            time: *self.time.state(),
            view: self.view,
            selection: self.selection.clone(),
            toggles: self.toggles,
            viewport: self.projector.viewport(),
        }
    }

    fn follow_selection(&mut self) {
        if !self.navigation.tracking || self.transition.is_animating() {
            return;
        }
        let Some(object) = self.selection.object.clone() else {
            return;
        };
        match self.direction_of(&object) {
            Some(direction) => self.view = ViewState::from_direction(direction, self.view.fov),
            None => {
                tracing::warn!("[sky] tracked object {object} no longer exists, tracking stopped");
                self.navigation.tracking = false;
            }
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        tracing::info!("[sky] screen size {width}x{height}");
        self.projector.set_viewport(Viewport::new(width, height));
    }

    /// Handles a decoded mouse button event. Returns true if it was used.
    pub fn handle_click(&mut self, x: f64, y: f64, state: ButtonState, button: MouseButton) -> bool {
        if let Some(ui) = self.ui.as_mut()
            && ui.handle_click(x, y, state, button)
        {
            return true;
        }

        match (button, state) {
            (MouseButton::WheelUp, ButtonState::Pressed) => {
                self.zoom_by_factor(1.0 / self.config.navigation.wheel_zoom_factor);
                true
            }
            (MouseButton::WheelDown, ButtonState::Pressed) => {
                self.zoom_by_factor(self.config.navigation.wheel_zoom_factor);
                true
            }
            (MouseButton::Left, ButtonState::Released) => {
                let picked = self.find_object_at(x, y);
                self.navigation.tracking = false;
                match picked {
                    Some(candidate) => {
                        let constellation = if self.toggles.constellation_pick
                            && candidate.object.kind == SubsystemKind::Stars
                        {
                            self.constellation_of(&candidate.object)
                        } else {
                            None
                        };
                        self.select(Some(candidate.object));
                        self.selection.select_constellation(constellation);
                    }
                    None => self.clear_selection(),
                }
                true
            }
            (MouseButton::Right, ButtonState::Released) => {
                self.clear_selection();
                true
            }
            (MouseButton::Middle, ButtonState::Released) => {
                self.goto_selected_and_track();
                true
            }
            _ => false,
        }
    }

    /// Records the pointer position. Returns true if the UI consumed it.
    pub fn handle_move(&mut self, x: f64, y: f64) -> bool {
        self.cursor = Some((x, y));
        self.ui.as_mut().is_some_and(|ui| ui.handle_move(x, y))
    }

    /// Handles a decoded key event. Returns true if it was used.
    pub fn handle_key(&mut self, key: KeyAction, state: ButtonState) -> bool {
        if let Some(ui) = self.ui.as_mut()
            && ui.handle_key(key, state)
        {
            return true;
        }

        if key.is_continuous() {
            return self.apply_navigation_key(key, state.is_pressed());
        }

        if state != ButtonState::Pressed {
            return false;
        }

        let duration = self.config.transition.auto_move_duration;
        match key {
            KeyAction::ToggleGoZoom => self.toggle_selected_object_go_zoom(duration),
            KeyAction::GotoSelected => self.goto_selected_and_track(),
            KeyAction::TogglePause => self.time.toggle_pause(),
            KeyAction::TimeFaster => self.time.accelerate(),
            KeyAction::TimeSlower => self.time.decelerate(),
            KeyAction::RealTime => self.time.set_real_time(),
            KeyAction::ClearSelection => self.clear_selection(),
            KeyAction::ToggleTracking => {
                self.navigation.tracking =
                    !self.navigation.tracking && self.selection.object.is_some();
            }
            KeyAction::TurnLeft
            | KeyAction::TurnRight
            | KeyAction::TurnUp
            | KeyAction::TurnDown
            | KeyAction::ZoomIn
            | KeyAction::ZoomOut => return false,
        }
        true
    }

    fn apply_navigation_key(&mut self, key: KeyAction, active: bool) -> bool {
        let nav = &self.config.navigation;
        match key {
            KeyAction::TurnLeft if nav.enable_move_keys => self.navigation.turn_left(active),
            KeyAction::TurnRight if nav.enable_move_keys => self.navigation.turn_right(active),
            KeyAction::TurnUp if nav.enable_move_keys => self.navigation.turn_up(active),
            KeyAction::TurnDown if nav.enable_move_keys => self.navigation.turn_down(active),
            KeyAction::ZoomIn if nav.enable_zoom_keys => self.navigation.zoom_in(active),
            KeyAction::ZoomOut if nav.enable_zoom_keys => self.navigation.zoom_out(active),
            _ => return false,
        }
        true
    }

    fn zoom_by_factor(&mut self, factor: f64) {
        self.view.fov = self.navigation.clamp_fov(self.view.fov * factor);
    }

    fn goto_selected_and_track(&mut self) {
        let Some(object) = self.selection.object.clone() else {
            return;
        };
        if self.goto_object(&object, self.config.transition.auto_move_duration) {
            self.navigation.tracking = true;
        }
    }

    // ========================================================================
    // Picking and selection
    // ========================================================================

    /// Object under screen point `(x, y)`, if any is within the pick angle.
    pub fn find_object_at(&self, x: f64, y: f64) -> Option<Candidate> {
        let frame = self.frame_snapshot(0.0);
        self.picker
            .pick_by_screen_point(x, y, &*self.projector, &self.subsystems, &frame)
    }

    /// Object nearest to `direction`, if any is within the pick angle.
    pub fn find_object_in_direction(&self, direction: DVec3) -> Option<Candidate> {
        let frame = self.frame_snapshot(0.0);
        self.picker
            .pick_by_direction(direction, &self.subsystems, &frame)
    }

    /// Sets the selected object. Never starts a transition.
    pub fn select(&mut self, object: Option<ObjectRef>) {
        let label = object.as_ref().map(ToString::to_string);
        if self.selection.select(object) {
            match label {
                Some(label) => tracing::info!("[sky] selected {label}"),
                None => tracing::info!("[sky] selection cleared"),
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            tracing::info!("[sky] selection cleared");
        }
        self.selection.clear();
        self.navigation.tracking = false;
    }

    /// Current direction of `object`, resolved through its subsystem.
    pub fn direction_of(&self, object: &ObjectRef) -> Option<DVec3> {
        self.subsystem(object.kind)?.direction_of(&object.id)
    }

    /// Constellation containing `object`, from whichever subsystem knows.
    pub fn constellation_of(&self, object: &ObjectRef) -> Option<String> {
        self.subsystems
            .iter()
            .find_map(|subsystem| subsystem.constellation_of(object))
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Starts turning toward `object` over `duration_secs`.
    ///
    /// Returns false, without starting anything, if the object cannot be
    /// resolved.
    pub fn goto_object(&mut self, object: &ObjectRef, duration_secs: f64) -> bool {
        let Some(direction) = self.resolve(object) else {
            return false;
        };
        self.goto_direction(direction, duration_secs);
        true
    }

    pub fn goto_direction(&mut self, direction: DVec3, duration_secs: f64) {
        self.transition.goto(
            &self.view,
            self.navigation.tracking,
            direction,
            seconds_to_ms(duration_secs),
        );
    }

    /// Starts zooming to the close-up field of view of `object`.
    pub fn zoom_to_object(&mut self, object: &ObjectRef, duration_secs: f64) -> bool {
        let Some(fov) = self
            .subsystem(object.kind)
            .and_then(|subsystem| subsystem.close_fov(&object.id))
        else {
            tracing::warn!("[sky] no close-up field of view for {object}");
            return false;
        };
        self.zoom_to(fov, duration_secs);
        true
    }

    pub fn zoom_to(&mut self, fov: f64, duration_secs: f64) {
        let fov = self.navigation.clamp_fov(fov);
        self.transition.zoom_to(
            &self.view,
            self.navigation.tracking,
            fov,
            seconds_to_ms(duration_secs),
        );
    }

    /// Goes to and zooms on the selection, or returns to the saved view if
    /// already there (or on the way). No-op without a selection.
    pub fn toggle_selected_object_go_zoom(&mut self, duration_secs: f64) {
        let duration_ms = seconds_to_ms(duration_secs);

        if self.transition.is_go_zoom_on_object() {
            if let Some(was_tracking) = self.transition.toggle_back(&self.view, duration_ms) {
                self.navigation.tracking = was_tracking;
            }
            return;
        }

        let Some(object) = self.selection.object.clone() else {
            tracing::debug!("[sky] go/zoom toggle ignored: nothing selected");
            return;
        };
        let Some(direction) = self.resolve(&object) else {
            return;
        };
        let fov = self
            .subsystem(object.kind)
            .and_then(|subsystem| subsystem.close_fov(&object.id))
            .map_or(self.view.fov, |fov| self.navigation.clamp_fov(fov));

        tracing::info!("[sky] going to {object} (fov {fov:.2})");
        self.transition.go_zoom(
            &self.view,
            self.navigation.tracking,
            direction,
            fov,
            duration_ms,
        );
        self.navigation.tracking = true;
    }

    /// Stops an in-flight transition where it is.
    pub fn cancel_transition(&mut self) {
        self.transition.cancel();
    }

    fn resolve(&self, object: &ObjectRef) -> Option<DVec3> {
        let direction = self.direction_of(object);
        if direction.is_none() {
            tracing::warn!("[sky] {object} cannot be resolved, treating as no object");
        }
        direction
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Read-only snapshot for UI collaborators and pollers.
    pub fn status(&self) -> CoreStatus {
        CoreStatus {
            frame: self.frames.total_frames(),
            fps: self.frames.fps(),
            time: *self.time.state(),
            view: self.view,
            selection: self.selection.clone(),
            is_go_zoom_on_object: self.transition.is_go_zoom_on_object(),
            is_animating: self.transition.is_animating(),
            tracking: self.navigation.tracking,
            toggles: self.toggles,
            viewport: self.projector.viewport(),
            cursor: self.cursor,
        }
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Replaces the view outright, stopping any transition.
    pub fn set_view(&mut self, view: ViewState) {
        self.transition.cancel();
        self.view = ViewState::new(view.azimuth, view.altitude, self.navigation.clamp_fov(view.fov));
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut TimeController {
        &mut self.time
    }

    pub fn toggles(&self) -> &DisplayToggles {
        &self.toggles
    }

    pub fn toggles_mut(&mut self) -> &mut DisplayToggles {
        &mut self.toggles
    }

    pub fn navigation(&self) -> &NavigationIntegrator {
        &self.navigation
    }

    pub fn transition(&self) -> &TransitionAnimator {
        &self.transition
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_go_zoom_on_object(&self) -> bool {
        self.transition.is_go_zoom_on_object()
    }

    pub fn projector(&self) -> &dyn Projector {
        &*self.projector
    }
}

fn seconds_to_ms(seconds: f64) -> f64 {
    if seconds.is_finite() { seconds * 1000.0 } else { 0.0 }
}
