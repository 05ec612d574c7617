//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `SkyCorePlugin` with a fixed frame duration.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::bevy::events::SelectionChangedEvent;
use crate::bevy::plugin::SkyCorePlugin;
use crate::bevy::resources::{SkyCommand, SkyCommandQueue, SkyCoreRes};
use crate::bevy::state_store::SkyStores;
use crate::catalog::{CatalogEntry, PointCatalog};
use crate::config::{SkyConfig, StartupTime};
use crate::core::SkyCore;
use crate::status::CoreStatus;
use crate::subsystem::SubsystemKind;

/// Wall-clock length of one test frame.
pub const FRAME: Duration = Duration::from_millis(100);

/// Selection changes observed by the test app.
#[derive(Resource, Default)]
pub struct SelectionLog(pub Vec<SelectionChangedEvent>);

fn record_selection_changes(
    mut events: MessageReader<SelectionChangedEvent>,
    mut log: ResMut<SelectionLog>,
) {
    log.0.extend(events.read().cloned());
}

/// Deterministic configuration: preset clock, view at azimuth 0, altitude 20.
pub fn test_config() -> SkyConfig {
    let mut config = SkyConfig::default();
    config.time.startup = StartupTime::Preset { instant: 0.0 };
    config.navigation.init_azimuth = 0.0;
    config.navigation.init_altitude = 20.0;
    config
}

/// A few stars, with vega at the initial view center.
pub fn demo_stars() -> PointCatalog {
    PointCatalog::new(
        SubsystemKind::Stars,
        vec![
            CatalogEntry::at("vega", 0.0, 20.0, 0.0).in_constellation("Lyr"),
            CatalogEntry::at("deneb", 40.0, 35.0, 1.2).in_constellation("Cyg"),
            CatalogEntry::at("altair", 300.0, 10.0, 0.8).in_constellation("Aql"),
        ],
    )
}

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: SkyConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        app.add_plugins(SkyCorePlugin::new(config));
        app.init_resource::<SelectionLog>();
        app.add_systems(Update, record_selection_changes);
        // First update initializes time with a zero delta.
        app.update();
        Self { app }
    }

    /// Registers [`demo_stars`].
    pub fn with_stars(mut self) -> Self {
        self.core_mut().add_subsystem(Box::new(demo_stars()));
        self
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run `n` frame updates.
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, command: SkyCommand) {
        self.app.world().resource::<SkyCommandQueue>().push(command);
    }

    pub fn core(&self) -> &SkyCore {
        &self.app.world().resource::<SkyCoreRes>().0
    }

    pub fn core_mut(&mut self) -> &mut SkyCore {
        &mut self
            .app
            .world_mut()
            .resource_mut::<SkyCoreRes>()
            .into_inner()
            .0
    }

    /// Status as seen by a UI poller.
    pub fn status(&self) -> CoreStatus {
        self.app.world().resource::<SkyStores>().status.get_status()
    }

    pub fn store_version(&self) -> u64 {
        self.app.world().resource::<SkyStores>().status.get_version()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
