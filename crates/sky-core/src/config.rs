//! Immutable configuration supplied at init, plus the mutable display toggles.
//!
//! Configuration arrives either as JSON or as flat `section.field = value`
//! pairs produced by an external loader. Both paths go through serde and
//! `SkyConfig::validate`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::projector::ProjectionKind;
use crate::subsystem::SubsystemKind;
use crate::transition::EasingType;

/// Error type for configuration intake and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid field of view range: min {min} > max {max}")]
    FovRange { min: f64, max: f64 },
    #[error("Field of view {name} = {value} outside (0, 180]")]
    FovOutOfBounds { name: &'static str, value: f64 },
    #[error("Initial field of view {fov} outside [{min}, {max}]")]
    InitialFov { fov: f64, min: f64, max: f64 },
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("Pick angle must be within [0, 180] degrees, got {0}")]
    PickAngle(f64),
    #[error("Subsystem '{}' listed twice in picker priority", .0.label())]
    DuplicatePriority(SubsystemKind),
    #[error("Invalid configuration key '{0}': expected 'section.field'")]
    MalformedKey(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Complete configuration for the sky core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkyConfig {
    pub navigation: NavigationConfig,
    pub transition: TransitionConfig,
    pub picker: PickerConfig,
    pub time: TimeConfig,
    pub projection: ProjectionConfig,
    /// Initial display toggles. The core keeps a mutable copy.
    pub display: DisplayToggles,
}

impl SkyConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration from flat `section.field` / value pairs.
    ///
    /// Values are read as JSON literals (`1.5`, `true`, `"name"`,
    /// `{"mode": "actual"}`); anything that is not valid JSON is taken as a
    /// plain string. Later pairs override earlier ones.
    pub fn from_key_values<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut root = Map::new();

        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let Some((section, field)) = key.split_once('.') else {
                return Err(ConfigError::MalformedKey(key.to_string()));
            };
            if section.is_empty() || field.is_empty() {
                return Err(ConfigError::MalformedKey(key.to_string()));
            }

            let entry = root
                .entry(section.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = entry {
                fields.insert(field.to_string(), parse_literal(value.as_ref()));
            }
        }

        let config: Self = serde_json::from_value(Value::Object(root))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nav = &self.navigation;
        positive("navigation.move_speed", nav.move_speed)?;
        positive("navigation.zoom_speed", nav.zoom_speed)?;
        positive("navigation.wheel_zoom_factor", nav.wheel_zoom_factor)?;

        for (name, value) in [
            ("navigation.min_fov", nav.min_fov),
            ("navigation.max_fov", nav.max_fov),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 180.0 {
                return Err(ConfigError::FovOutOfBounds { name, value });
            }
        }
        if nav.min_fov > nav.max_fov {
            return Err(ConfigError::FovRange {
                min: nav.min_fov,
                max: nav.max_fov,
            });
        }
        if !(nav.min_fov..=nav.max_fov).contains(&nav.init_fov) {
            return Err(ConfigError::InitialFov {
                fov: nav.init_fov,
                min: nav.min_fov,
                max: nav.max_fov,
            });
        }
        finite("navigation.init_azimuth", nav.init_azimuth)?;
        finite("navigation.init_altitude", nav.init_altitude)?;

        finite(
            "transition.auto_move_duration",
            self.transition.auto_move_duration,
        )?;

        let angle = self.picker.max_pick_angle;
        if !angle.is_finite() || !(0.0..=180.0).contains(&angle) {
            return Err(ConfigError::PickAngle(angle));
        }
        for (index, kind) in self.picker.priority.iter().enumerate() {
            if self.picker.priority[..index].contains(kind) {
                return Err(ConfigError::DuplicatePriority(*kind));
            }
        }

        finite("time.rate", self.time.rate)?;
        if let StartupTime::Preset { instant } = self.time.startup {
            finite("time.startup.instant", instant)?;
        }

        Ok(())
    }
}

fn parse_literal(raw: &str) -> Value {
    let raw = raw.trim();
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Manual navigation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Turn speed in radians per second at full deflection.
    pub move_speed: f64,
    /// Zoom speed in degrees of field of view per second.
    pub zoom_speed: f64,
    /// Field of view limits in degrees.
    pub min_fov: f64,
    pub max_fov: f64,
    /// Field of view at startup, in degrees.
    pub init_fov: f64,
    /// Startup azimuth in degrees.
    pub init_azimuth: f64,
    /// Startup altitude in degrees.
    pub init_altitude: f64,
    /// Whether the turn keys move the view.
    pub enable_move_keys: bool,
    /// Whether the zoom keys change the field of view.
    pub enable_zoom_keys: bool,
    /// Scale turn speed by `fov / init_fov`, so panning slows when zoomed in.
    pub fov_scaled_move: bool,
    /// Field of view ratio applied per mouse wheel notch.
    pub wheel_zoom_factor: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.8,
            zoom_speed: 30.0,
            min_fov: 0.001,
            max_fov: 100.0,
            init_fov: 60.0,
            init_azimuth: 0.0,
            init_altitude: 20.0,
            enable_move_keys: true,
            enable_zoom_keys: true,
            fov_scaled_move: false,
            wheel_zoom_factor: 1.1,
        }
    }
}

/// Automatic go-to / zoom-to settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Duration of automatic moves in seconds.
    pub auto_move_duration: f64,
    pub easing: EasingType,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            auto_move_duration: 1.5,
            easing: EasingType::EaseInOut,
        }
    }
}

/// Object picking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Candidates farther than this from the query direction are ignored (degrees).
    pub max_pick_angle: f64,
    /// Tie-break order between subsystems; unlisted kinds follow in
    /// declaration order.
    pub priority: Vec<SubsystemKind>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_pick_angle: 5.0,
            priority: vec![
                SubsystemKind::SolarSystem,
                SubsystemKind::Nebulae,
                SubsystemKind::Stars,
            ],
        }
    }
}

/// How the simulated clock starts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StartupTime {
    /// Start at the current wall-clock time.
    #[default]
    Actual,
    /// Start at a fixed instant (seconds since J2000).
    Preset { instant: f64 },
}

/// Simulated clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeConfig {
    pub startup: StartupTime,
    /// Initial rate (simulated seconds per wall second).
    pub rate: f64,
    pub start_paused: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            startup: StartupTime::Actual,
            rate: 1.0,
            start_paused: false,
        }
    }
}

/// Projection and viewport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub kind: ProjectionKind,
    pub width: u32,
    pub height: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Perspective,
            width: 800,
            height: 600,
        }
    }
}

/// Display toggles queried by render delegation and picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct DisplayToggles {
    pub stars: bool,
    pub star_names: bool,
    pub planets: bool,
    pub planet_hints: bool,
    pub nebulae: bool,
    pub nebula_names: bool,
    pub milky_way: bool,
    pub constellation_lines: bool,
    pub constellation_names: bool,
    /// Selecting a star also selects its constellation.
    pub constellation_pick: bool,
    pub azimuthal_grid: bool,
    pub equatorial_grid: bool,
    pub equator_line: bool,
    pub ecliptic_line: bool,
    pub cardinal_points: bool,
    pub atmosphere: bool,
    pub ground: bool,
    pub fog: bool,
    pub show_fps: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            stars: true,
            star_names: true,
            planets: true,
            planet_hints: true,
            nebulae: true,
            nebula_names: false,
            milky_way: true,
            constellation_lines: false,
            constellation_names: false,
            constellation_pick: false,
            azimuthal_grid: false,
            equatorial_grid: false,
            equator_line: false,
            ecliptic_line: false,
            cardinal_points: true,
            atmosphere: true,
            ground: true,
            fog: true,
            show_fps: false,
        }
    }
}

impl DisplayToggles {
    /// Whether a subsystem of this kind is drawn and picked.
    pub fn shows(&self, kind: SubsystemKind) -> bool {
        match kind {
            SubsystemKind::Atmosphere => self.atmosphere,
            SubsystemKind::Landscape => self.ground || self.fog,
            SubsystemKind::MilkyWay => self.milky_way,
            SubsystemKind::Nebulae => self.nebulae,
            SubsystemKind::Stars => self.stars,
            SubsystemKind::SolarSystem => self.planets,
            SubsystemKind::Constellations => {
                self.constellation_lines || self.constellation_names || self.constellation_pick
            }
            SubsystemKind::Grids => {
                self.azimuthal_grid || self.equatorial_grid || self.equator_line || self.ecliptic_line
            }
            SubsystemKind::Cardinals => self.cardinal_points,
        }
    }
}
