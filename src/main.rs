//! Interactive 3D rose gift.
//!
//! Tap the rose to open it, read the letter, then unwrap the gifts. Tab or
//! F1 toggles the director debug panel, F3 the frame counter, Escape quits.

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use bloom_gift::camera::CameraConfig;
use bloom_gift::debug_panel::DebugPanelPlugin;
use bloom_gift::overlay::{OverlayConfig, OverlayPlugin};
use bloom_gift::render_loop::{RenderLoopConfig, RenderLoopPlugin};
use bloom_gift::store::{Experience, debug_panel_visible};
use bloom_gift::visuals::{VisualsConfig, VisualsPlugin};
use bloom_gift::{ExperienceConfig, ExperiencePlugin};

#[cfg(feature = "native")]
mod cli {
    use bloom_gift::store::{PerformanceLevel, Scene, StoreConfig};
    use clap::Parser;

    /// Bloom Gift
    #[derive(Parser, Debug)]
    #[command(version, about)]
    pub struct Cli {
        /// Scene to start in (prelude, intro, flower, climax, chocolate, ending).
        #[arg(long, default_value = "prelude")]
        scene: Scene,
        /// Rendering tier.
        #[arg(long, value_enum, default_value_t = PerformanceLevel::Medium)]
        performance: PerformanceLevel,
        /// Open the debug panel on launch.
        #[arg(long)]
        debug: bool,
    }

    impl Cli {
        pub fn store_config(&self) -> StoreConfig {
            StoreConfig {
                start_scene: self.scene,
                performance_level: self.performance,
                debug_panel_visible: self.debug,
            }
        }
    }

}

fn main() {
    #[cfg(feature = "native")]
    let store = {
        use clap::Parser;
        cli::Cli::parse().store_config()
    };
    #[cfg(not(feature = "native"))]
    let store = bloom_gift::store::StoreConfig::default();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Bloom Gift".into(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(ExperiencePlugin(ExperienceConfig {
        store,
        ..default()
    }))
    .add_plugins(VisualsPlugin(VisualsConfig::default()))
    .add_plugins(OverlayPlugin(OverlayConfig::default()))
    .add_plugins(RenderLoopPlugin(RenderLoopConfig::default()))
    .add_plugins(DebugPanelPlugin)
    .add_systems(Update, (exit_on_esc, toggle_debug_keys))
    .add_plugins(ResourceInspectorPlugin::<CameraConfig>::default().run_if(debug_panel_visible));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

fn toggle_debug_keys(keys: Res<ButtonInput<KeyCode>>, mut exp: ResMut<Experience>) {
    if keys.any_just_pressed([KeyCode::Tab, KeyCode::F1]) {
        exp.toggle_debug_panel();
        info!("debug panel: {}", exp.debug_panel_visible());
    }
    if keys.just_pressed(KeyCode::F3) {
        let show = !exp.show_fps();
        exp.set_show_fps(show);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
