//! Director debug panel.
//!
//! Every control maps to a store action, never to a raw field, so a scene
//! jump runs the regular transition sequence and a bloom change recomputes
//! the derived parameters. The store itself is not exposed to reflection
//! tooling; only configs are.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::DirectorSet;
use crate::camera::{CameraArrived, CameraRig};
use crate::store::{
    Experience, FocusTarget, LayerKey, LayerParam, ModelKey, PerformanceLevel, Scene,
    debug_panel_visible,
};

/// Sliders offered for layer tunables, with their upper bound.
const TUNABLES: [(LayerParam, f32); 8] = [
    (LayerParam::HeartCount, 200.0),
    (LayerParam::MeteorCount, 120.0),
    (LayerParam::RainCount, 1000.0),
    (LayerParam::FilmGrainIntensity, 0.3),
    (LayerParam::VignetteDarkness, 2.0),
    (LayerParam::AmbientIntensity, 1.0),
    (LayerParam::FloatingWordsCount, 60.0),
    (LayerParam::Warmth, 1.0),
];

const PERFORMANCE: [PerformanceLevel; 3] = [
    PerformanceLevel::Low,
    PerformanceLevel::Medium,
    PerformanceLevel::High,
];

/// Control used in the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugAction {
    /// Jump to a scene through the transition sequence.
    RequestScene(Scene),
    /// Drag bloom progress.
    SetBloom(f32),
    /// Point the camera at a target.
    SetFocus(FocusTarget),
    /// Flip one ambient layer.
    ToggleLayer(LayerKey),
    /// Change one layer tunable.
    SetLayerParam(LayerParam, f32),
    /// Switch rendering tier.
    SetPerformance(PerformanceLevel),
    /// Freeze or unfreeze story and camera input.
    SetFrozen(bool),
    /// Flip a model's visibility override.
    ToggleModel(ModelKey),
    /// Reveal the next gift.
    AdvanceGift,
    /// Hide all gifts again.
    ResetGifts,
}

/// Applies one debug control through the matching store action.
pub fn apply_debug_action(exp: &mut Experience, action: DebugAction) {
    match action {
        DebugAction::RequestScene(scene) => exp.request_scene_transition(scene, None),
        DebugAction::SetBloom(value) => exp.set_bloom_progress(value),
        DebugAction::SetFocus(target) => exp.set_focus_target(target),
        DebugAction::ToggleLayer(key) => exp.toggle_layer(key),
        DebugAction::SetLayerParam(param, value) => exp.set_layer_param(param, value),
        DebugAction::SetPerformance(level) => exp.set_performance_level(level),
        DebugAction::SetFrozen(frozen) => exp.set_frozen(frozen),
        DebugAction::ToggleModel(model) => exp.toggle_model_visibility(model),
        DebugAction::AdvanceGift => exp.advance_gift_reveal(),
        DebugAction::ResetGifts => exp.reset_gift_reveal(),
    }
}

/// Camera arrivals seen so far.
#[derive(Resource, Debug, Default)]
pub struct CameraLog {
    /// Number of moves that landed.
    pub arrivals: u64,
    /// Most recent arrival.
    pub last: Option<CameraArrived>,
}

/// Debug window over the director, shown while the store's debug flag is on.
pub struct DebugPanelPlugin;

impl Plugin for DebugPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraLog>()
            .add_systems(Update, record_camera_arrivals.after(DirectorSet::Camera))
            .add_systems(
                EguiPrimaryContextPass,
                draw_debug_panel.run_if(debug_panel_visible),
            );
    }
}

fn record_camera_arrivals(mut arrived: MessageReader<CameraArrived>, mut log: ResMut<CameraLog>) {
    for ev in arrived.read() {
        log.arrivals += 1;
        log.last = Some(*ev);
    }
}

fn draw_debug_panel(
    mut contexts: EguiContexts,
    rig: Res<CameraRig>,
    log: Res<CameraLog>,
    mut exp: ResMut<Experience>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut actions = Vec::new();
    let state: &Experience = &exp;

    egui::Window::new("Director")
        .default_pos([16.0, 16.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "scene {}  step {}  focus {:?}",
                state.current_scene(),
                state.story_step(),
                state.focus_target()
            ));
            let pending = state.pending_transition().map(|p| p.scene);
            ui.label(format!(
                "pending {pending:?}  animating {}  camera moving {}",
                state.is_animating(),
                state.is_camera_transitioning()
            ));
            ui.label(format!(
                "camera moves {}  arrivals {}  last {:?}",
                rig.last_id(),
                log.arrivals,
                log.last.map(|a| a.target)
            ));

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for scene in Scene::ALL {
                    if ui.button(scene.key()).clicked() {
                        actions.push(DebugAction::RequestScene(scene));
                    }
                }
            });

            let mut bloom = state.bloom_progress();
            if ui
                .add(egui::Slider::new(&mut bloom, 0.0..=1.0).text("bloom"))
                .changed()
            {
                actions.push(DebugAction::SetBloom(bloom));
            }

            ui.horizontal_wrapped(|ui| {
                ui.label("focus");
                for target in FocusTarget::ALL {
                    let current = target == state.focus_target();
                    if ui.selectable_label(current, format!("{target:?}")).clicked() {
                        actions.push(DebugAction::SetFocus(target));
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("tier");
                for level in PERFORMANCE {
                    let current = level == state.performance_level();
                    if ui.selectable_label(current, format!("{level:?}")).clicked() {
                        actions.push(DebugAction::SetPerformance(level));
                    }
                }
            });

            let mut frozen = state.is_frozen();
            if ui.checkbox(&mut frozen, "frozen").changed() {
                actions.push(DebugAction::SetFrozen(frozen));
            }

            ui.collapsing("layers", |ui| {
                for key in LayerKey::ALL {
                    let mut on = state.active_layers().get(key);
                    if ui.checkbox(&mut on, format!("{key:?}")).changed() {
                        actions.push(DebugAction::ToggleLayer(key));
                    }
                }
            });

            ui.collapsing("tunables", |ui| {
                for (param, max) in TUNABLES {
                    let mut value = state.layer_params().get(param);
                    let slider =
                        egui::Slider::new(&mut value, 0.0..=max).text(format!("{param:?}"));
                    if ui.add(slider).changed() {
                        actions.push(DebugAction::SetLayerParam(param, value));
                    }
                }
            });

            ui.collapsing("models", |ui| {
                for model in ModelKey::ALL {
                    let mut shown = state.visible_models().get(model);
                    if ui.checkbox(&mut shown, format!("{model:?}")).changed() {
                        actions.push(DebugAction::ToggleModel(model));
                    }
                }
                ui.horizontal(|ui| {
                    if ui.button("next gift").clicked() {
                        actions.push(DebugAction::AdvanceGift);
                    }
                    if ui.button("reset gifts").clicked() {
                        actions.push(DebugAction::ResetGifts);
                    }
                });
            });
        });

    for action in actions {
        debug!("debug panel: {action:?}");
        apply_debug_action(&mut exp, action);
    }
    Ok(())
}
