//! Bevy plugin for the sky core.
//!
//! Logic only: no rendering or window dependencies, so it runs under
//! `MinimalPlugins` in headless hosts and tests.

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::{SkyCommandQueue, SkyCoreRes};
use crate::bevy::state_store::SkyStores;
use crate::bevy::systems;
use crate::config::SkyConfig;
use crate::core::SkyCore;
use crate::projector::{SkyProjector, Viewport};

/// Installs a [`SkyCore`] and the systems that drive it.
///
/// Pass a `command_queue` or `stores` handle to share them with code
/// outside the app; fresh ones are created otherwise.
pub struct SkyCorePlugin {
    pub config: SkyConfig,
    pub command_queue: Option<SkyCommandQueue>,
    pub stores: Option<SkyStores>,
}

impl Default for SkyCorePlugin {
    fn default() -> Self {
        Self {
            config: SkyConfig::default(),
            command_queue: None,
            stores: None,
        }
    }
}

impl SkyCorePlugin {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn build_core(&self) -> SkyCore {
        match SkyCore::with_default_projector(self.config.clone()) {
            Ok(core) => core,
            Err(e) => {
                tracing::error!("[sky] invalid configuration, falling back to defaults: {e}");
                let config = SkyConfig::default();
                let projector = SkyProjector::new(
                    config.projection.kind,
                    Viewport::new(config.projection.width, config.projection.height),
                );
                SkyCore::assemble(config, Box::new(projector))
            }
        }
    }
}

impl Plugin for SkyCorePlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(SkyCoreRes(self.build_core()))
            .insert_resource(self.command_queue.clone().unwrap_or_default())
            .insert_resource(self.stores.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<SkyInputEvent>()
            .add_message::<SelectionChangedEvent>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::process_sky_commands,
                systems::apply_sky_input,
                systems::tick_sky_core,
                systems::detect_selection_change,
                systems::sync_status_to_store,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::resources::SkyCommand;
    use crate::bevy::test_utils::{SelectionLog, TestApp, test_config};
    use crate::input::{ButtonState, KeyAction, MouseButton};
    use crate::subsystem::{ObjectRef, SubsystemKind};

    fn vega() -> ObjectRef {
        ObjectRef::new(SubsystemKind::Stars, "vega")
    }

    #[test]
    fn test_plugin_installs_core_and_store() {
        let mut app = TestApp::new();
        app.run(3);

        assert!(app.world().get_resource::<SkyCoreRes>().is_some());
        assert!(app.status().frame >= 3);
    }

    #[test]
    fn test_tick_uses_virtual_time() {
        let mut app = TestApp::new();
        let start = app.core().time().instant();
        app.run(10);
        let elapsed = app.core().time().instant() - start;
        assert!((elapsed - 1.0).abs() < 1e-6, "elapsed {elapsed}");
    }

    #[test]
    fn test_key_commands_forwarded() {
        let mut app = TestApp::new();
        let start = app.core().view().azimuth;

        app.push_command(SkyCommand::Key {
            key: KeyAction::TurnRight,
            state: ButtonState::Pressed,
        });
        app.run(5);
        let turned = app.core().view().azimuth;
        assert!(turned > start);

        app.push_command(SkyCommand::Key {
            key: KeyAction::TurnRight,
            state: ButtonState::Released,
        });
        app.update();
        let stopped = app.core().view().azimuth;
        app.run(5);
        assert_eq!(app.core().view().azimuth, stopped);
    }

    #[test]
    fn test_messages_written_by_other_systems_forwarded() {
        let mut app = TestApp::new();
        app.world_mut().write_message(SkyInputEvent::from(SkyResizeEvent {
            width: 1024,
            height: 768,
        }));
        app.world_mut()
            .write_message(SkyInputEvent::from(SkyMoveEvent { x: 5.0, y: 6.0 }));
        app.update();

        let status = app.status();
        assert_eq!(status.viewport, Viewport::new(1024, 768));
        assert_eq!(status.cursor, Some((5.0, 6.0)));
    }

    #[test]
    fn test_click_then_go_zoom_in_one_frame() {
        let mut app = TestApp::new().with_stars();

        app.push_command(SkyCommand::Click {
            x: 400.0,
            y: 300.0,
            state: ButtonState::Released,
            button: MouseButton::Left,
        });
        app.push_command(SkyCommand::Key {
            key: KeyAction::ToggleGoZoom,
            state: ButtonState::Pressed,
        });
        app.update();

        let status = app.status();
        assert_eq!(status.selection.object, Some(vega()));
        assert!(status.is_go_zoom_on_object);
    }

    #[test]
    fn test_select_applied_in_queue_order() {
        let mut app = TestApp::new().with_stars();

        app.push_command(SkyCommand::Click {
            x: 400.0,
            y: 300.0,
            state: ButtonState::Released,
            button: MouseButton::Left,
        });
        app.push_command(SkyCommand::Select { object: None });
        app.update();

        assert_eq!(app.status().selection.object, None);
    }

    #[test]
    fn test_input_messages_keep_write_order() {
        let mut app = TestApp::new().with_stars();

        app.world_mut().write_message(SkyInputEvent::from(SkyClickEvent {
            x: 400.0,
            y: 300.0,
            state: ButtonState::Released,
            button: MouseButton::Left,
        }));
        app.world_mut()
            .write_message(SkyInputEvent::from(SkyGoZoomEvent::default()));
        app.update();

        assert!(app.status().is_go_zoom_on_object);
    }

    #[test]
    fn test_click_selects_and_emits_change() {
        let mut app = TestApp::new().with_stars();
        let version = app.store_version();

        app.push_command(SkyCommand::Click {
            x: 400.0,
            y: 300.0,
            state: ButtonState::Released,
            button: MouseButton::Left,
        });
        app.run(2);

        assert_eq!(app.status().selection.object, Some(vega()));
        assert!(app.store_version() > version);

        let log = app.world().resource::<SelectionLog>();
        assert_eq!(log.0.len(), 1);
        assert_eq!(log.0[0].previous, None);
        assert_eq!(log.0[0].current, Some(vega()));
    }

    #[test]
    fn test_go_zoom_round_trip_through_commands() {
        let mut app = TestApp::new().with_stars();
        let before = *app.core().view();

        app.push_command(SkyCommand::Select {
            object: Some(ObjectRef::new(SubsystemKind::Stars, "deneb")),
        });
        app.push_command(SkyCommand::ToggleGoZoom {
            duration_secs: Some(0.5),
        });
        app.run(8);
        assert!(app.status().is_go_zoom_on_object);
        assert!(!app.status().is_animating);

        app.push_command(SkyCommand::ToggleGoZoom {
            duration_secs: Some(0.5),
        });
        app.run(8);
        assert!(!app.status().is_go_zoom_on_object);
        assert_eq!(*app.core().view(), before);
    }

    #[test]
    fn test_yield_defers_commands() {
        let mut app = TestApp::new();
        app.push_command(SkyCommand::SetTimeRate { rate: 10.0 });
        app.push_command(SkyCommand::Yield);
        app.push_command(SkyCommand::SetTimeRate { rate: 100.0 });

        app.update();
        assert_eq!(app.core().time().state().nominal_rate(), 10.0);
        app.update();
        assert_eq!(app.core().time().state().nominal_rate(), 100.0);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut config = test_config();
        config.navigation.min_fov = 90.0;
        config.navigation.max_fov = 10.0;
        let app = TestApp::with_config(config);

        assert_eq!(*app.core().config(), SkyConfig::default());
    }
}
