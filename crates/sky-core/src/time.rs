//! Simulated time and its rate.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{StartupTime, TimeConfig};

/// Julian day of the J2000.0 epoch (2000-01-01 12:00 TT, taken as UTC here).
pub const J2000_JULIAN_DAY: f64 = 2_451_545.0;

/// Seconds in a day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Largest accepted rate magnitude (simulated seconds per wall second).
pub const MAX_TIME_RATE: f64 = 1.0e9;

/// Rate multiplier applied by `accelerate` / `decelerate`.
const RATE_STEP: f64 = 10.0;

/// Current simulated instant and how fast it moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeState {
    /// Simulated instant in seconds since J2000.
    pub instant: f64,
    /// Rate applied while running (1.0 = real time). Zero while paused.
    pub rate: f64,
    /// Whether time is paused.
    pub paused: bool,
    /// Rate to restore on resume.
    pub saved_rate: f64,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            instant: 0.0,
            rate: 1.0,
            paused: false,
            saved_rate: 1.0,
        }
    }
}

impl TimeState {
    /// The rate actually applied to time advancement.
    pub fn effective_rate(&self) -> f64 {
        if self.paused { 0.0 } else { self.rate }
    }

    /// The rate that is in force once time runs (the saved one while paused).
    pub fn nominal_rate(&self) -> f64 {
        if self.paused { self.saved_rate } else { self.rate }
    }

    /// Simulated instant as a Julian day.
    pub fn julian_day(&self) -> f64 {
        J2000_JULIAN_DAY + self.instant / SECONDS_PER_DAY
    }
}

/// Owns the simulated time and advances it each frame.
#[derive(Debug, Clone, Default)]
pub struct TimeController {
    state: TimeState,
}

impl TimeController {
    /// Creates a controller at the given instant, running in real time.
    pub fn new(instant: f64) -> Self {
        Self {
            state: TimeState {
                instant,
                ..TimeState::default()
            },
        }
    }

    /// Creates a controller from the time configuration section.
    pub fn from_config(config: &TimeConfig) -> Self {
        let instant = match config.startup {
            StartupTime::Actual => seconds_since_j2000(Utc::now()),
            StartupTime::Preset { instant } => instant,
        };
        let mut controller = Self::new(instant);
        controller.set_rate(config.rate);
        if config.start_paused {
            controller.pause();
        }
        controller
    }

    pub fn state(&self) -> &TimeState {
        &self.state
    }

    pub fn instant(&self) -> f64 {
        self.state.instant
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Advances simulated time by `delta_ms` wall-clock milliseconds.
    pub fn advance(&mut self, delta_ms: f64) {
        self.state.instant += delta_ms / 1000.0 * self.state.effective_rate();
    }

    /// Stops time, remembering the current rate. Idempotent.
    pub fn pause(&mut self) {
        if self.state.paused {
            return;
        }
        self.state.saved_rate = self.state.rate;
        self.state.rate = 0.0;
        self.state.paused = true;
        tracing::debug!("[time] paused (saved rate {})", self.state.saved_rate);
    }

    /// Restores the rate saved by `pause`. Idempotent.
    pub fn resume(&mut self) {
        if !self.state.paused {
            return;
        }
        self.state.rate = self.state.saved_rate;
        self.state.paused = false;
        tracing::debug!("[time] resumed at rate {}", self.state.rate);
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Sets the stored rate. While paused it takes effect on resume.
    pub fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            tracing::warn!("[time] ignoring non-finite rate {rate}");
            return;
        }
        let rate = rate.clamp(-MAX_TIME_RATE, MAX_TIME_RATE);

        if self.state.paused {
            self.state.saved_rate = rate;
        } else {
            self.state.rate = rate;
        }
    }

    pub fn set_real_time(&mut self) {
        self.set_rate(1.0);
    }

    /// Multiplies the rate by ten, keeping its sign. A zero rate becomes 1.
    pub fn accelerate(&mut self) {
        let rate = self.state.nominal_rate();
        self.set_rate(if rate == 0.0 { 1.0 } else { rate * RATE_STEP });
    }

    /// Divides the rate by ten, keeping its sign.
    pub fn decelerate(&mut self) {
        let rate = self.state.nominal_rate();
        self.set_rate(rate / RATE_STEP);
    }

    pub fn set_instant(&mut self, instant: f64) {
        if instant.is_finite() {
            self.state.instant = instant;
        }
    }
}

/// Seconds elapsed between the J2000 epoch and `time`.
pub fn seconds_since_j2000(time: DateTime<Utc>) -> f64 {
    let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).single();
    match epoch {
        Some(epoch) => {
            let delta = time.signed_duration_since(epoch);
            delta.num_milliseconds() as f64 / 1000.0
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_real_time() {
        let mut time = TimeController::new(100.0);
        time.advance(1500.0);
        assert!((time.instant() - 101.5).abs() < 1e-12);
    }

    #[test]
    fn test_pause_stops_advance() {
        let mut time = TimeController::new(0.0);
        time.set_rate(60.0);
        time.pause();
        time.advance(1000.0);
        assert_eq!(time.instant(), 0.0);
        assert_eq!(time.state().effective_rate(), 0.0);

        time.resume();
        time.advance(1000.0);
        assert!((time.instant() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_pause_idempotent() {
        let mut once = TimeController::new(5.0);
        once.set_rate(3.0);
        let mut twice = once.clone();

        once.pause();
        once.resume();

        twice.pause();
        twice.pause();
        twice.resume();

        assert_eq!(once.state(), twice.state());
        assert_eq!(twice.state().rate, 3.0);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut time = TimeController::new(0.0);
        time.set_rate(2.0);
        let before = *time.state();
        time.resume();
        assert_eq!(*time.state(), before);
    }

    #[test]
    fn test_set_rate_while_paused_applies_on_resume() {
        let mut time = TimeController::new(0.0);
        time.pause();
        time.set_rate(7.0);
        assert_eq!(time.state().effective_rate(), 0.0);
        time.resume();
        assert_eq!(time.state().effective_rate(), 7.0);
    }

    #[test]
    fn test_accelerate_and_decelerate() {
        let mut time = TimeController::new(0.0);
        time.accelerate();
        assert_eq!(time.state().rate, 10.0);
        time.decelerate();
        time.decelerate();
        assert!((time.state().rate - 0.1).abs() < 1e-12);

        time.set_rate(-1.0);
        time.accelerate();
        assert_eq!(time.state().rate, -10.0);
    }

    #[test]
    fn test_rate_clamped_and_non_finite_ignored() {
        let mut time = TimeController::new(0.0);
        time.set_rate(1.0e12);
        assert_eq!(time.state().rate, MAX_TIME_RATE);
        time.set_rate(f64::NAN);
        assert_eq!(time.state().rate, MAX_TIME_RATE);
    }

    #[test]
    fn test_j2000_epoch() {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(seconds_since_j2000(epoch), 0.0);

        let next_day = Utc.with_ymd_and_hms(2000, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(seconds_since_j2000(next_day), SECONDS_PER_DAY);

        let time = TimeController::new(SECONDS_PER_DAY);
        assert_eq!(time.state().julian_day(), J2000_JULIAN_DAY + 1.0);
    }
}
