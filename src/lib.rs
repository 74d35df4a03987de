#![warn(missing_docs)]
//! Scene director for an interactive 3D rose gift.
//!
//! A single [`store::Experience`] resource holds the scene, bloom, story and
//! gift state. Transitions, story progression, focus derivation and camera
//! moves reconcile against it once per frame, in [`DirectorSet`] order, so
//! every change is visible to the next stage within the same frame.

pub mod camera;
pub mod debug_panel;
pub mod gift;
pub mod math;
pub mod overlay;
pub mod render_loop;
pub mod rose;
pub mod story;
pub mod store;
pub mod transition;
pub mod visuals;

#[cfg(test)]
mod scenarios;

use bevy::prelude::*;

/// Per-frame reconciliation order of the director.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectorSet {
    /// Transition sequence and the prelude failsafe.
    Sequence,
    /// Story step and caption timing.
    Story,
    /// Focus derivation and story-triggered focus.
    Focus,
    /// Camera moves and pointer orbit.
    Camera,
}

/// Configuration bundle for [`ExperiencePlugin`].
#[derive(Clone, Debug, Default)]
pub struct ExperienceConfig {
    /// Initial store state.
    pub store: store::StoreConfig,
    /// Transition timing.
    pub transition: transition::TransitionConfig,
    /// Caption timing.
    pub story: story::StoryConfig,
    /// Camera smoothing and orbit limits.
    pub camera: camera::CameraConfig,
    /// Rose tap tuning.
    pub rose: rose::RoseConfig,
}

/// Headless orchestration core: store, transitions, story, camera director
/// and rose taps. Rendering, overlay and the render-loop activator are
/// separate plugins.
pub struct ExperiencePlugin(pub ExperienceConfig);

impl Plugin for ExperiencePlugin {
    fn build(&self, app: &mut App) {
        let cfg = &self.0;
        app.configure_sets(
            Update,
            (
                DirectorSet::Sequence,
                DirectorSet::Story,
                DirectorSet::Focus,
                DirectorSet::Camera,
            )
                .chain(),
        )
        .add_plugins((
            store::StorePlugin(cfg.store.clone()),
            transition::TransitionPlugin(cfg.transition.clone()),
            story::StoryPlugin(cfg.story.clone()),
            camera::CameraPlugin(cfg.camera.clone()),
            rose::RosePlugin(cfg.rose.clone()),
        ));
    }
}
