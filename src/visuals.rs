//! Stage visuals: camera, bloom, light, placeholder models and the
//! starfield layer.
//!
//! Everything here reads the store and mirrors it onto entities. Nothing in
//! this module writes back, except the rose observers which route taps into
//! [`crate::rose`].

mod entities;
mod systems;

pub use entities::{AmbientLayer, RoseGlow};

use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;

use crate::DirectorSet;
use crate::store::debug_panel_visible;

/// Per-plugin configuration for the stage.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct VisualsConfig {
    /// Camera bloom intensity per unit of the store's `bloom_intensity`.
    pub bloom_scale: f32,
    /// Number of stars in the starfield layer.
    pub star_count: usize,
    /// Radius of the star shell around the origin.
    pub star_radius: f32,
    /// Size of a single star.
    pub star_size: f32,
    /// Base intensity of the rose glow light (lumens).
    pub glow_lumens: f32,
    /// Background clear color.
    pub clear_color: Color,
}

impl Default for VisualsConfig {
    fn default() -> Self {
        Self {
            bloom_scale: 0.4,
            star_count: 600,
            star_radius: 60.0,
            star_size: 0.08,
            glow_lumens: 40_000.0,
            clear_color: Color::srgb(0.01, 0.005, 0.02),
        }
    }
}

/// Spawns the stage and keeps it in sync with the store.
pub struct VisualsPlugin(pub VisualsConfig);

impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<MeshPickingPlugin>() {
            app.add_plugins(MeshPickingPlugin);
        }
        app.register_type::<VisualsConfig>()
            .register_type::<AmbientLayer>()
            .register_type::<RoseGlow>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(Startup, systems::setup_stage)
            .add_systems(
                Update,
                (
                    systems::sync_models,
                    systems::sync_layers,
                    systems::sync_bloom,
                    systems::pulse_rose_glow,
                )
                    .after(DirectorSet::Camera),
            )
            .add_systems(
                Update,
                systems::draw_focus_poses.run_if(debug_panel_visible),
            );
    }
}
