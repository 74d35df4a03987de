//! Camera director.
//!
//! Maps the store's focus target onto a fixed pose table and glides the
//! [`CameraRig`] there with critically damped smoothing. The store's
//! `camera_transitioning` flag is raised when a move starts and dropped when
//! the most recent move lands. Pointer orbit / zoom works between moves and
//! is disabled while the store is frozen.

mod entities;
mod systems;

pub use entities::{CameraArrived, CameraMove, CameraRig, DirectorCamera, FocusPose, focus_pose};

use bevy::prelude::*;

use crate::DirectorSet;
use crate::store::not_frozen;

/// Per-plugin configuration for the camera director.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Approximate time to cover most of a move (seconds).
    pub smooth_time: f32,
    /// Distance under which a move counts as converged.
    pub arrive_epsilon: f32,
    /// Closest dolly distance to the look-at point.
    pub min_distance: f32,
    /// Farthest dolly distance from the look-at point.
    pub max_distance: f32,
    /// Orbit angle per pixel of drag (radians).
    pub orbit_sensitivity: f32,
    /// Dolly distance per scroll line.
    pub zoom_sensitivity: f32,
    /// Margin from vertical to prevent the orbit from flipping (radians).
    pub pitch_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smooth_time: 1.2,
            arrive_epsilon: 0.01,
            min_distance: 2.0,
            max_distance: 35.0,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 1.0,
            pitch_margin: 0.05,
        }
    }
}

/// Focus-driven camera moves plus pointer orbit.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<DirectorCamera>()
            .register_type::<CameraConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<CameraRig>()
            .add_message::<CameraArrived>()
            .add_systems(
                Update,
                (
                    systems::follow_focus_target,
                    systems::orbit_camera.run_if(not_frozen),
                    systems::step_camera_move,
                    systems::apply_rig_to_camera,
                )
                    .chain()
                    .in_set(DirectorSet::Camera),
            );
    }
}
