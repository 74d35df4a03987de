//! Rose interaction.
//!
//! A tap on the rose in the prelude starts the intro. Afterwards each tap
//! opens another ring of petals, drives bloom from the petal count and asks
//! for the flower scene once the rose is mostly open. Drags count as
//! inspection, not taps.

use bevy::picking::events::{DragStart, Out, Over, Pointer, Press, Release};
use bevy::prelude::*;

use crate::store::{ENVELOPE_BLOOM, Experience, Scene, TOTAL_PETALS};

/// Per-plugin configuration for rose taps.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct RoseConfig {
    /// Petals opened by one tap.
    pub petals_per_touch: u32,
    /// Open fraction that moves `intro` on to `flower`.
    pub flower_threshold: f32,
}

impl Default for RoseConfig {
    fn default() -> Self {
        Self {
            petals_per_touch: 6,
            flower_threshold: ENVELOPE_BLOOM,
        }
    }
}

/// Pointer hold on the rose; `dragged` turns the release into a no-op.
#[derive(Resource, Debug, Default)]
pub struct RoseHold {
    dragged: bool,
}

/// Rose tap handling. The visuals attach the `on_rose_*` observers to the
/// rose mesh.
pub struct RosePlugin(pub RoseConfig);

impl Plugin for RosePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<RoseConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<RoseHold>();
    }
}

/// Applies one tap. Returns the scene requested by the tap, if any.
pub fn touch_rose(exp: &mut Experience, cfg: &RoseConfig) -> Option<Scene> {
    if exp.current_scene() == Scene::Prelude {
        exp.request_scene_transition(Scene::Intro, None);
        return Some(Scene::Intro);
    }

    let next = (exp.open_count() + cfg.petals_per_touch).min(TOTAL_PETALS);
    if next == exp.open_count() {
        return None;
    }
    exp.set_open_count(next);
    exp.set_bloom_progress(next as f32 / TOTAL_PETALS as f32);

    let ready = next as f32 >= TOTAL_PETALS as f32 * cfg.flower_threshold;
    if ready && exp.current_scene() == Scene::Intro {
        exp.request_scene_transition(Scene::Flower, None);
        return Some(Scene::Flower);
    }
    None
}

/// Hover on.
pub fn on_rose_over(_: On<Pointer<Over>>, mut exp: ResMut<Experience>) {
    exp.set_rose_hover(true);
}

/// Hover off; also ends any hold.
pub fn on_rose_out(_: On<Pointer<Out>>, mut exp: ResMut<Experience>) {
    exp.set_rose_hover(false);
    exp.set_is_inspecting(false);
}

/// Starts a hold.
pub fn on_rose_press(
    _: On<Pointer<Press>>,
    mut hold: ResMut<RoseHold>,
    mut exp: ResMut<Experience>,
) {
    hold.dragged = false;
    exp.set_is_inspecting(true);
}

/// Marks the hold as a drag.
pub fn on_rose_drag_start(_: On<Pointer<DragStart>>, mut hold: ResMut<RoseHold>) {
    hold.dragged = true;
}

/// Ends the hold; a release without a drag is a tap.
pub fn on_rose_release(
    _: On<Pointer<Release>>,
    cfg: Res<RoseConfig>,
    hold: Res<RoseHold>,
    mut exp: ResMut<Experience>,
) {
    exp.set_is_inspecting(false);
    if hold.dragged {
        return;
    }
    if let Some(scene) = touch_rose(&mut exp, &cfg) {
        info!("rose tap requested {scene}");
    }
}
