//! Sky-Live Headless Runner
//!
//! Runs the sky core inside a minimal Bevy app with a demo catalog and
//! replays a short scripted session: turn, pick, go/zoom, return.
//!
//! Usage: `sky-headless [config.json]`

use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use sky_core::bevy::{
    SelectionChangedEvent, SkyCommand, SkyCommandQueue, SkyCorePlugin, SkyCoreRes, SkyStores,
};
use sky_core::{
    ButtonState, CatalogEntry, KeyAction, MouseButton, ObjectRef, PointCatalog, SkyConfig,
    SubsystemKind,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulated wall-clock frame length.
const FRAME: Duration = Duration::from_micros(16_667);

/// Observer latitude for the demo sky, degrees.
const LATITUDE: f64 = 48.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            SkyConfig::from_json_str(&json).with_context(|| format!("invalid config file {path}"))?
        }
        None => SkyConfig::default(),
    };

    let queue = SkyCommandQueue::new();
    let stores = SkyStores::new();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.add_plugins(SkyCorePlugin {
        config,
        command_queue: Some(queue.clone()),
        stores: Some(stores.clone()),
    });
    app.add_systems(Update, log_selection_changes);

    {
        let mut core = app.world_mut().resource_mut::<SkyCoreRes>();
        core.0.add_subsystem(Box::new(bright_stars()));
        core.0.add_subsystem(Box::new(planets()));
    }

    for step in script() {
        tracing::info!("[headless] {}", step.label);
        for command in step.commands {
            queue.push(command);
        }
        for _ in 0..step.frames {
            app.update();
        }

        let status = stores.status.get_status();
        tracing::info!(
            "[headless] az={:.3} alt={:.3} fov={:.2} selected={} parked={} tracking={}",
            status.view.azimuth.to_degrees(),
            status.view.altitude.to_degrees(),
            status.view.fov,
            status
                .selection
                .object
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            status.is_go_zoom_on_object,
            status.tracking,
        );
    }

    let status = stores.status.get_status();
    let json = serde_json::to_string_pretty(&status).context("failed to serialize status")?;
    tracing::info!("[headless] final status (version {}):\n{json}", stores.status.get_version());

    Ok(())
}

fn log_selection_changes(mut events: MessageReader<SelectionChangedEvent>) {
    for event in events.read() {
        tracing::info!(
            "[headless] selection {:?} -> {:?}",
            event.previous.as_ref().map(|o| o.id.as_str()),
            event.current.as_ref().map(|o| o.id.as_str()),
        );
    }
}

// ============================================================================
// Script
// ============================================================================

struct Step {
    label: &'static str,
    commands: Vec<SkyCommand>,
    frames: usize,
}

fn key(key: KeyAction, state: ButtonState) -> SkyCommand {
    SkyCommand::Key { key, state }
}

fn script() -> Vec<Step> {
    vec![
        Step {
            label: "resize to 1280x720",
            commands: vec![SkyCommand::Resize {
                width: 1280,
                height: 720,
            }],
            frames: 1,
        },
        Step {
            label: "turn right for one second",
            commands: vec![key(KeyAction::TurnRight, ButtonState::Pressed)],
            frames: 60,
        },
        Step {
            label: "stop turning, look up a little",
            commands: vec![
                key(KeyAction::TurnRight, ButtonState::Released),
                key(KeyAction::TurnUp, ButtonState::Pressed),
            ],
            frames: 20,
        },
        Step {
            label: "stop, pick at screen center",
            commands: vec![
                key(KeyAction::TurnUp, ButtonState::Released),
                SkyCommand::Click {
                    x: 640.0,
                    y: 360.0,
                    state: ButtonState::Released,
                    button: MouseButton::Left,
                },
            ],
            frames: 1,
        },
        Step {
            label: "select Jupiter and go/zoom to it",
            commands: vec![
                SkyCommand::Select {
                    object: Some(ObjectRef::new(SubsystemKind::SolarSystem, "jupiter")),
                },
                key(KeyAction::ToggleGoZoom, ButtonState::Pressed),
            ],
            frames: 120,
        },
        Step {
            label: "speed up time while tracking",
            commands: vec![SkyCommand::SetTimeRate { rate: 600.0 }],
            frames: 120,
        },
        Step {
            label: "toggle back to the saved view",
            commands: vec![
                SkyCommand::SetTimeRate { rate: 1.0 },
                key(KeyAction::ToggleGoZoom, ButtonState::Pressed),
            ],
            frames: 120,
        },
    ]
}

// ============================================================================
// Demo catalog
// ============================================================================

fn bright_stars() -> PointCatalog {
    PointCatalog::new(
        SubsystemKind::Stars,
        vec![
            CatalogEntry::at("polaris", 0.0, LATITUDE, 2.0).in_constellation("UMi"),
            CatalogEntry::at("vega", 60.0, 35.0, 0.0).in_constellation("Lyr"),
            CatalogEntry::at("deneb", 75.0, 25.0, 1.3).in_constellation("Cyg"),
            CatalogEntry::at("altair", 100.0, 15.0, 0.8).in_constellation("Aql"),
            CatalogEntry::at("arcturus", 260.0, 40.0, -0.1).in_constellation("Boo"),
            CatalogEntry::at("spica", 230.0, 12.0, 1.0).in_constellation("Vir"),
            CatalogEntry::at("antares", 170.0, 10.0, 1.1).in_constellation("Sco"),
            CatalogEntry::at("capella", 340.0, 8.0, 0.1).in_constellation("Aur"),
            CatalogEntry::at("dubhe", 320.0, 55.0, 1.8).in_constellation("UMa"),
        ],
    )
    .with_limiting_magnitude(6.0)
    .with_diurnal_motion(LATITUDE)
}

fn planets() -> PointCatalog {
    PointCatalog::new(
        SubsystemKind::SolarSystem,
        vec![
            CatalogEntry::at("jupiter", 140.0, 22.0, -2.5).with_close_fov(0.5),
            CatalogEntry::at("saturn", 120.0, 18.0, 0.6).with_close_fov(0.8),
            CatalogEntry::at("mars", 200.0, 30.0, 1.2).with_close_fov(0.2),
        ],
    )
    .with_diurnal_motion(LATITUDE)
}
