//! Camera orientation and field of view.
//!
//! Directions live in the observer's local horizontal frame: `x` points to
//! azimuth 0 on the horizon, `y` to azimuth 90°, `z` to the zenith.

use std::f64::consts::{FRAC_PI_2, TAU};

use bevy::math::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Altitude limit, kept just inside the poles so azimuth stays defined.
pub const MAX_ALTITUDE: f64 = FRAC_PI_2 - 1.0e-6;

/// Default field of view in degrees.
pub const DEFAULT_FOV: f64 = 60.0;

/// The live camera orientation and field of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Azimuth in radians, wrapped to `[0, 2π)`.
    pub azimuth: f64,
    /// Altitude in radians, clamped to `±MAX_ALTITUDE`.
    pub altitude: f64,
    /// Field of view in degrees.
    pub fov: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_FOV)
    }
}

impl ViewState {
    /// Creates a view, normalizing azimuth and clamping altitude.
    pub fn new(azimuth: f64, altitude: f64, fov: f64) -> Self {
        Self {
            azimuth: wrap_azimuth(azimuth),
            altitude: clamp_altitude(altitude),
            fov,
        }
    }

    /// Creates a view looking along `direction`.
    ///
    /// A zero vector looks at azimuth 0 on the horizon.
    pub fn from_direction(direction: DVec3, fov: f64) -> Self {
        let d = direction.normalize_or_zero();
        if d == DVec3::ZERO {
            return Self::new(0.0, 0.0, fov);
        }
        let altitude = d.z.clamp(-1.0, 1.0).asin();
        let azimuth = d.y.atan2(d.x);
        Self::new(azimuth, altitude, fov)
    }

    /// Unit viewing direction.
    pub fn direction(&self) -> DVec3 {
        direction_from_az_alt(self.azimuth, self.altitude)
    }

    /// Unit vector pointing toward increasing azimuth (screen right).
    pub fn right(&self) -> DVec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        DVec3::new(-sin_az, cos_az, 0.0)
    }

    /// Unit vector pointing toward increasing altitude (screen up).
    pub fn up(&self) -> DVec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_alt, cos_alt) = self.altitude.sin_cos();
        DVec3::new(-sin_alt * cos_az, -sin_alt * sin_az, cos_alt)
    }

    /// Rotates the view by the given azimuth and altitude steps (radians).
    pub fn rotate(&mut self, delta_az: f64, delta_alt: f64) {
        self.azimuth = wrap_azimuth(self.azimuth + delta_az);
        self.altitude = clamp_altitude(self.altitude + delta_alt);
    }

    /// Returns true if both views agree within `epsilon` (radians for the
    /// direction, degrees for the field of view).
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        angular_separation(self.direction(), other.direction()) <= epsilon
            && (self.fov - other.fov).abs() <= epsilon
    }
}

/// A snapshot of the view taken right before a go-to/zoom-to transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub view: ViewState,
    /// Whether the camera was tracking the selection when the snapshot was taken.
    pub was_tracking: bool,
}

/// Wraps an azimuth to `[0, 2π)`.
pub fn wrap_azimuth(azimuth: f64) -> f64 {
    let wrapped = azimuth.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamps an altitude to `±MAX_ALTITUDE`.
pub fn clamp_altitude(altitude: f64) -> f64 {
    altitude.clamp(-MAX_ALTITUDE, MAX_ALTITUDE)
}

/// Unit direction for an azimuth/altitude pair.
pub fn direction_from_az_alt(azimuth: f64, altitude: f64) -> DVec3 {
    let (sin_az, cos_az) = azimuth.sin_cos();
    let (sin_alt, cos_alt) = altitude.sin_cos();
    DVec3::new(cos_alt * cos_az, cos_alt * sin_az, sin_alt)
}

/// Angle between two directions in radians.
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate for tiny and near-antipodal
/// separations where `acos` does not.
pub fn angular_separation(a: DVec3, b: DVec3) -> f64 {
    let a = a.normalize_or_zero();
    let b = b.normalize_or_zero();
    a.cross(b).length().atan2(a.dot(b))
}

/// Spherical linear interpolation between two directions.
///
/// Antipodal directions turn about an arbitrary perpendicular axis.
pub fn slerp(from: DVec3, to: DVec3, t: f64) -> DVec3 {
    let a = from.normalize_or_zero();
    let b = to.normalize_or_zero();
    if a == DVec3::ZERO || b == DVec3::ZERO {
        return b;
    }
    let arc = DQuat::from_rotation_arc(a, b);
    (DQuat::IDENTITY.slerp(arc, t) * a).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        let view = ViewState::new(1.2, 0.4, 30.0);
        let back = ViewState::from_direction(view.direction(), 30.0);
        assert!((back.azimuth - 1.2).abs() < 1e-12);
        assert!((back.altitude - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_azimuth_wraps() {
        let mut view = ViewState::new(TAU - 0.1, 0.0, 60.0);
        view.rotate(0.3, 0.0);
        assert!((view.azimuth - 0.2).abs() < 1e-12);

        view.rotate(-0.5, 0.0);
        assert!((view.azimuth - (TAU - 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_clamped() {
        let mut view = ViewState::default();
        view.rotate(0.0, 10.0);
        assert_eq!(view.altitude, MAX_ALTITUDE);
        view.rotate(0.0, -20.0);
        assert_eq!(view.altitude, -MAX_ALTITUDE);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let view = ViewState::new(0.7, -0.3, 60.0);
        let (f, r, u) = (view.direction(), view.right(), view.up());
        assert!(f.dot(r).abs() < 1e-12);
        assert!(f.dot(u).abs() < 1e-12);
        assert!(r.dot(u).abs() < 1e-12);
        assert!((r.length() - 1.0).abs() < 1e-12);
        assert!((u.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = DVec3::X;
        let b = DVec3::Y;
        assert!(angular_separation(slerp(a, b, 0.0), a) < 1e-12);
        assert!(angular_separation(slerp(a, b, 1.0), b) < 1e-9);

        let mid = slerp(a, b, 0.5);
        assert!((angular_separation(a, mid) - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn test_slerp_antipodal_stays_unit() {
        let mid = slerp(DVec3::X, -DVec3::X, 0.5);
        assert!((mid.length() - 1.0).abs() < 1e-12);
        assert!((angular_separation(DVec3::X, mid) - FRAC_PI_2).abs() < 1e-9);
    }
}
