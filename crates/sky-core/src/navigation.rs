//! Continuous manual navigation.
//!
//! Key intents set per-axis deltas in {-1, 0, +1}; `integrate` turns them
//! into azimuth, altitude and field of view steps proportional to the frame
//! duration, so the net motion does not depend on how a span of time is
//! split into frames.

use serde::{Deserialize, Serialize};

use crate::config::NavigationConfig;
use crate::view::ViewState;

/// Held state of the two opposing keys of one axis.
///
/// The most recently pressed key that is still held owns the axis. Releasing
/// the owning key hands the axis to the opposite key if that one is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AxisIntent {
    negative_held: bool,
    positive_held: bool,
    delta: i8,
}

impl AxisIntent {
    fn set(&mut self, positive: bool, active: bool) {
        if active {
            if positive {
                self.positive_held = true;
                self.delta = 1;
            } else {
                self.negative_held = true;
                self.delta = -1;
            }
            return;
        }

        if positive {
            self.positive_held = false;
            if self.delta == 1 {
                self.delta = if self.negative_held { -1 } else { 0 };
            }
        } else {
            self.negative_held = false;
            if self.delta == -1 {
                self.delta = if self.positive_held { 1 } else { 0 };
            }
        }
    }

    fn value(self) -> f64 {
        f64::from(self.delta)
    }
}

/// Per-axis navigation rates, each in {-1, 0, +1}.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationDeltas {
    pub delta_az: f64,
    pub delta_alt: f64,
    pub delta_fov: f64,
}

/// Integrates held navigation keys into the view each frame.
#[derive(Debug, Clone)]
pub struct NavigationIntegrator {
    azimuth: AxisIntent,
    altitude: AxisIntent,
    fov: AxisIntent,
    move_speed: f64,
    zoom_speed: f64,
    min_fov: f64,
    max_fov: f64,
    init_fov: f64,
    fov_scaled_move: bool,
    /// Whether the view follows the selected object.
    pub tracking: bool,
}

impl NavigationIntegrator {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            azimuth: AxisIntent::default(),
            altitude: AxisIntent::default(),
            fov: AxisIntent::default(),
            move_speed: config.move_speed,
            zoom_speed: config.zoom_speed,
            min_fov: config.min_fov,
            max_fov: config.max_fov,
            init_fov: config.init_fov,
            fov_scaled_move: config.fov_scaled_move,
            tracking: false,
        }
    }

    pub fn turn_left(&mut self, active: bool) {
        self.azimuth.set(false, active);
    }

    pub fn turn_right(&mut self, active: bool) {
        self.azimuth.set(true, active);
    }

    pub fn turn_up(&mut self, active: bool) {
        self.altitude.set(true, active);
    }

    pub fn turn_down(&mut self, active: bool) {
        self.altitude.set(false, active);
    }

    pub fn zoom_in(&mut self, active: bool) {
        self.fov.set(false, active);
    }

    pub fn zoom_out(&mut self, active: bool) {
        self.fov.set(true, active);
    }

    pub fn deltas(&self) -> NavigationDeltas {
        NavigationDeltas {
            delta_az: self.azimuth.value(),
            delta_alt: self.altitude.value(),
            delta_fov: self.fov.value(),
        }
    }

    /// True while an azimuth or altitude key is in effect.
    pub fn is_turning(&self) -> bool {
        self.azimuth.delta != 0 || self.altitude.delta != 0
    }

    pub fn is_zooming(&self) -> bool {
        self.fov.delta != 0
    }

    /// Clamps a field of view to the configured range.
    pub fn clamp_fov(&self, fov: f64) -> f64 {
        fov.clamp(self.min_fov, self.max_fov)
    }

    /// Applies the held deltas for `delta_ms` milliseconds.
    pub fn integrate(&self, delta_ms: f64, view: &mut ViewState) {
        let seconds = delta_ms.max(0.0) / 1000.0;
        if seconds == 0.0 {
            return;
        }

        let deltas = self.deltas();
        let fov_rate = deltas.delta_fov * self.zoom_speed;
        let end_fov = self.clamp_fov(view.fov + fov_rate * seconds);

        if self.is_turning() {
            let mut speed = self.move_speed;
            if self.fov_scaled_move {
                speed *= self.mean_fov(view.fov, fov_rate, seconds) / self.init_fov;
            }
            view.rotate(
                deltas.delta_az * speed * seconds,
                deltas.delta_alt * speed * seconds,
            );
        }

        if self.is_zooming() {
            view.fov = end_fov;
        }
    }

    /// Time-averaged fov over a step that starts at `fov` and zooms at
    /// `rate` deg/s until it reaches a limit.
    fn mean_fov(&self, fov: f64, rate: f64, seconds: f64) -> f64 {
        if rate == 0.0 {
            return fov;
        }
        let limit = if rate > 0.0 { self.max_fov } else { self.min_fov };
        let free = ((limit - fov) / rate).clamp(0.0, seconds);
        let reached = fov + rate * free;
        ((fov + reached) / 2.0 * free + limit * (seconds - free)) / seconds
    }
}
