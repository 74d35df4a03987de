//! Experience store: the single source of truth for scene orchestration.
//!
//! [`Experience`] is a Bevy resource holding scene identity, progress
//! variables, layer toggles and tunables. Fields are private; subsystems read
//! through accessors and write through the named actions below, each of which
//! is synchronous and leaves the store consistent before returning.

mod entities;
mod presets;

pub use entities::{
    FocusTarget, LayerActivation, LayerKey, LayerParam, LayerParams, ModelKey, ModelTransform,
    ModelTransforms, PendingTransition, PerformanceLevel, Scene, TOTAL_PETALS, TransformField,
    TransitionOptions, UnknownScene, VisibleModels,
};

use bevy::prelude::*;

use crate::math;

/// Highest gift-reveal stage.
pub const MAX_GIFT_STAGE: u8 = 3;

/// Bloom level at which the envelope shows up and the story moves past its
/// opening line.
pub const ENVELOPE_BLOOM: f32 = 0.85;

/// Initial values for the store.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct StoreConfig {
    /// Scene committed at startup.
    pub start_scene: Scene,
    /// Initial rendering tier.
    pub performance_level: PerformanceLevel,
    /// Open the debug panel on launch.
    pub debug_panel_visible: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            start_scene: Scene::Prelude,
            performance_level: PerformanceLevel::Medium,
            debug_panel_visible: false,
        }
    }
}

/// Inserts the [`Experience`] store built from a [`StoreConfig`].
pub struct StorePlugin(pub StoreConfig);

impl Plugin for StorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<StoreConfig>()
            .register_type::<Experience>()
            .register_type::<Scene>()
            .register_type::<FocusTarget>()
            .register_type::<PendingTransition>()
            .register_type::<LayerActivation>()
            .register_type::<LayerParams>()
            .register_type::<VisibleModels>()
            .register_type::<ModelTransforms>()
            .insert_resource(self.0.clone())
            .insert_resource(Experience::from_config(&self.0));
    }
}

/// Run condition: the store is not frozen.
pub fn not_frozen(exp: Res<Experience>) -> bool {
    !exp.is_frozen()
}

/// Run condition: the debug panel is open.
pub fn debug_panel_visible(exp: Res<Experience>) -> bool {
    exp.debug_panel_visible()
}

/// Process-wide orchestration state.
///
/// Reflected for reading only: no `ReflectResource` is registered, so
/// inspectors and the Remote Protocol cannot write fields behind the actions.
#[derive(Resource, Debug, Clone, Reflect)]
pub struct Experience {
    current_scene: Scene,
    focus_target: FocusTarget,
    bloom_progress: f32,
    bloom_complete: bool,
    open_count: u32,
    story_step: usize,
    frozen: bool,
    active_layers: LayerActivation,
    layer_params: LayerParams,
    pending_transition: Option<PendingTransition>,
    transition_seq: u64,
    performance_level: PerformanceLevel,
    show_fps: bool,
    debug_panel_visible: bool,
    audio_playing: bool,
    audio_volume: f32,
    rose_hover: bool,
    is_inspecting: bool,
    is_reading_letter: bool,
    has_read_letter: bool,
    has_tasted_chocolate: bool,
    gift_reveal_stage: u8,
    camera_transitioning: bool,
    is_animating: bool,
    visible_models: VisibleModels,
    model_transforms: ModelTransforms,
}

impl Default for Experience {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl Experience {
    /// Builds the initial state. The start scene is committed through
    /// [`Experience::set_scene`] and bloom through
    /// [`Experience::set_bloom_progress`], so layers and derived parameters
    /// are consistent from the first frame.
    pub fn from_config(cfg: &StoreConfig) -> Self {
        let mut exp = Self {
            current_scene: Scene::Prelude,
            focus_target: FocusTarget::Rose,
            bloom_progress: 0.0,
            bloom_complete: false,
            open_count: 0,
            story_step: 0,
            frozen: false,
            active_layers: LayerActivation::for_scene(Scene::Prelude),
            layer_params: LayerParams::default(),
            pending_transition: None,
            transition_seq: 0,
            performance_level: cfg.performance_level,
            show_fps: false,
            debug_panel_visible: cfg.debug_panel_visible,
            audio_playing: false,
            audio_volume: 0.5,
            rose_hover: false,
            is_inspecting: false,
            is_reading_letter: false,
            has_read_letter: false,
            has_tasted_chocolate: false,
            gift_reveal_stage: 0,
            camera_transitioning: false,
            is_animating: false,
            visible_models: VisibleModels::default(),
            model_transforms: ModelTransforms::default(),
        };
        exp.set_scene(cfg.start_scene);
        exp.set_bloom_progress(0.0);
        exp
    }

    // ── Read access ─────────────────────────────────────────────────

    /// Committed scene.
    pub fn current_scene(&self) -> Scene {
        self.current_scene
    }

    /// Camera preset the director is heading to.
    pub fn focus_target(&self) -> FocusTarget {
        self.focus_target
    }

    /// Flower-opening completion in `[0, 1]`.
    pub fn bloom_progress(&self) -> f32 {
        self.bloom_progress
    }

    /// `true` once bloom progress reached `1`.
    pub fn bloom_complete(&self) -> bool {
        self.bloom_complete
    }

    /// Petals opened so far, at most [`TOTAL_PETALS`].
    pub fn open_count(&self) -> u32 {
        self.open_count
    }

    /// Index into the story script.
    pub fn story_step(&self) -> usize {
        self.story_step
    }

    /// Modal / screenshot freeze: disables story progression and camera input.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Current ambient layer toggles.
    pub fn active_layers(&self) -> &LayerActivation {
        &self.active_layers
    }

    /// Layer tunables, including the bloom-derived parameters.
    pub fn layer_params(&self) -> &LayerParams {
        &self.layer_params
    }

    /// Outstanding transition request, if any.
    pub fn pending_transition(&self) -> Option<&PendingTransition> {
        self.pending_transition.as_ref()
    }

    /// Rendering budget tier.
    pub fn performance_level(&self) -> PerformanceLevel {
        self.performance_level
    }

    /// Whether the FPS counter is requested.
    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    /// Whether the debug panel is open.
    pub fn debug_panel_visible(&self) -> bool {
        self.debug_panel_visible
    }

    /// Background music toggle.
    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    /// Background music volume in `[0, 1]`.
    pub fn audio_volume(&self) -> f32 {
        self.audio_volume
    }

    /// Pointer is over the rose.
    pub fn rose_hover(&self) -> bool {
        self.rose_hover
    }

    /// A model is being held / inspected.
    pub fn is_inspecting(&self) -> bool {
        self.is_inspecting
    }

    /// The letter overlay is open.
    pub fn is_reading_letter(&self) -> bool {
        self.is_reading_letter
    }

    /// The letter has been read and closed at least once.
    pub fn has_read_letter(&self) -> bool {
        self.has_read_letter
    }

    /// The chocolate has been tasted.
    pub fn has_tasted_chocolate(&self) -> bool {
        self.has_tasted_chocolate
    }

    /// Gift reveal stage in `0..=3`.
    pub fn gift_reveal_stage(&self) -> u8 {
        self.gift_reveal_stage
    }

    /// A camera move is in flight.
    pub fn is_camera_transitioning(&self) -> bool {
        self.camera_transitioning
    }

    /// A transition sequence is running; the render loop must not idle.
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    /// Debug visibility overrides.
    pub fn visible_models(&self) -> &VisibleModels {
        &self.visible_models
    }

    /// Per-model stage placement.
    pub fn model_transforms(&self) -> &ModelTransforms {
        &self.model_transforms
    }

    // ── Scene ───────────────────────────────────────────────────────

    /// Commits `scene`: replaces the active layers wholesale with the scene
    /// preset and moves focus to the scene default for `chocolate` and
    /// `ending`. Other scenes leave focus untouched.
    pub fn set_scene(&mut self, scene: Scene) {
        self.current_scene = scene;
        self.active_layers = LayerActivation::for_scene(scene);
        match scene {
            Scene::Chocolate => self.focus_target = FocusTarget::Chocolate,
            Scene::Ending => self.focus_target = FocusTarget::Center,
            _ => {}
        }
    }

    /// Overwrites the pending transition slot. A request for the current
    /// scene is legal and still runs the full sequence.
    pub fn request_scene_transition(&mut self, scene: Scene, options: Option<TransitionOptions>) {
        self.transition_seq += 1;
        self.pending_transition = Some(PendingTransition {
            scene,
            options: options.unwrap_or_default(),
            seq: self.transition_seq,
        });
    }

    /// Empties the pending transition slot.
    pub fn clear_pending_transition(&mut self) {
        self.pending_transition = None;
    }

    /// Points the camera director at `target`.
    pub fn set_focus_target(&mut self, target: FocusTarget) {
        self.focus_target = target;
    }

    // ── Bloom ───────────────────────────────────────────────────────

    /// Sets bloom progress (clamped to `[0, 1]`) and recomputes everything
    /// derived from it.
    pub fn set_bloom_progress(&mut self, value: f32) {
        let clamped = math::clamp_unit(value);
        self.bloom_progress = clamped;
        self.bloom_complete = clamped >= 1.0;
        self.layer_params.bloom_intensity = math::bloom_intensity(clamped);
        self.layer_params.dof_focus = math::dof_focus(clamped);
    }

    /// Sets the opened-petal count, bounded by [`TOTAL_PETALS`].
    pub fn set_open_count(&mut self, count: u32) {
        self.open_count = count.min(TOTAL_PETALS);
    }

    // ── Story & flags ───────────────────────────────────────────────

    /// Jumps the story to `step`.
    pub fn set_story_step(&mut self, step: usize) {
        self.story_step = step;
    }

    /// Advances the story by exactly one line.
    pub fn next_story_step(&mut self) {
        self.story_step += 1;
    }

    /// Back to the first story line.
    pub fn reset_story(&mut self) {
        self.story_step = 0;
    }

    /// Freezes or unfreezes story progression and camera input.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// One-way: the letter has been read.
    pub fn mark_read_letter(&mut self) {
        self.has_read_letter = true;
    }

    /// One-way: the chocolate has been tasted.
    pub fn mark_tasted_chocolate(&mut self) {
        self.has_tasted_chocolate = true;
    }

    /// Opens or closes the letter overlay.
    pub fn set_reading_letter(&mut self, reading: bool) {
        self.is_reading_letter = reading;
    }

    /// Pointer hover state of the rose.
    pub fn set_rose_hover(&mut self, hover: bool) {
        self.rose_hover = hover;
    }

    /// Interaction lock while a model is held.
    pub fn set_is_inspecting(&mut self, inspecting: bool) {
        self.is_inspecting = inspecting;
    }

    /// Reveals the next gift. Past stage 3 this is a no-op.
    pub fn advance_gift_reveal(&mut self) {
        self.gift_reveal_stage = (self.gift_reveal_stage + 1).min(MAX_GIFT_STAGE);
    }

    /// Hides all gifts again.
    pub fn reset_gift_reveal(&mut self) {
        self.gift_reveal_stage = 0;
    }

    // ── Layers ──────────────────────────────────────────────────────

    /// Manual override of one layer; lasts until the next scene commit.
    pub fn set_layer(&mut self, key: LayerKey, active: bool) {
        self.active_layers.set(key, active);
    }

    /// Flips one layer; lasts until the next scene commit.
    pub fn toggle_layer(&mut self, key: LayerKey) {
        let active = self.active_layers.get(key);
        self.active_layers.set(key, !active);
    }

    /// Applies the preset for `scene` without committing the scene.
    pub fn enable_layers_for_scene(&mut self, scene: Scene) {
        self.active_layers = LayerActivation::for_scene(scene);
    }

    /// Sets one tunable layer parameter.
    pub fn set_layer_param(&mut self, param: LayerParam, value: f32) {
        self.layer_params.set(param, value);
    }

    /// Sets several tunable layer parameters at once.
    pub fn set_layer_params(&mut self, patch: impl IntoIterator<Item = (LayerParam, f32)>) {
        for (param, value) in patch {
            self.layer_params.set(param, value);
        }
    }

    // ── Runtime / tooling ───────────────────────────────────────────

    /// Switches rendering tier.
    pub fn set_performance_level(&mut self, level: PerformanceLevel) {
        self.performance_level = level;
    }

    /// Shows or hides the FPS counter.
    pub fn set_show_fps(&mut self, show: bool) {
        self.show_fps = show;
    }

    /// Opens or closes the debug panel.
    pub fn toggle_debug_panel(&mut self) {
        self.debug_panel_visible = !self.debug_panel_visible;
    }

    /// Flips background music.
    pub fn toggle_audio(&mut self) {
        self.audio_playing = !self.audio_playing;
    }

    /// Starts or stops background music.
    pub fn set_audio_playing(&mut self, playing: bool) {
        self.audio_playing = playing;
    }

    /// Sets music volume, clamped to `[0, 1]`.
    pub fn set_audio_volume(&mut self, volume: f32) {
        self.audio_volume = math::clamp_unit(volume);
    }

    /// Owned by the transition controller.
    pub fn set_is_animating(&mut self, animating: bool) {
        self.is_animating = animating;
    }

    /// Owned by the camera director.
    pub fn set_camera_transitioning(&mut self, transitioning: bool) {
        self.camera_transitioning = transitioning;
    }

    /// Flips the debug visibility override of `model`.
    pub fn toggle_model_visibility(&mut self, model: ModelKey) {
        self.visible_models.toggle(model);
    }

    /// Replaces one field of `model`'s transform.
    pub fn set_model_transform(&mut self, model: ModelKey, field: TransformField) {
        let record = self.model_transforms.get_mut(model);
        match field {
            TransformField::Position(p) => record.position = p,
            TransformField::Rotation(r) => record.rotation = r,
            TransformField::Scale(s) => record.scale = s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn store_is_not_writable_through_reflection() {
        let mut app = App::new();
        app.add_plugins(StorePlugin(StoreConfig::default()));
        let registry = app.world().resource::<AppTypeRegistry>().read();
        let registration = registry.get(std::any::TypeId::of::<Experience>());
        assert!(registration.is_some());
        assert!(
            registration
                .and_then(|r| r.data::<bevy::ecs::reflect::ReflectResource>())
                .is_none()
        );
    }

    #[test]
    fn initial_state_is_consistent() {
        let exp = Experience::default();
        assert_eq!(exp.current_scene(), Scene::Prelude);
        assert_eq!(exp.focus_target(), FocusTarget::Rose);
        assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Prelude));
        assert!(approx(exp.layer_params().bloom_intensity(), 0.1));
        assert!(approx(exp.layer_params().dof_focus(), 4.0));
        assert!(exp.pending_transition().is_none());
    }

    #[test]
    fn start_scene_from_config_applies_preset() {
        let exp = Experience::from_config(&StoreConfig {
            start_scene: Scene::Ending,
            ..default()
        });
        assert_eq!(exp.current_scene(), Scene::Ending);
        assert_eq!(exp.focus_target(), FocusTarget::Center);
        assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Ending));
    }

    #[test]
    fn bloom_is_clamped() {
        let mut exp = Experience::default();
        exp.set_bloom_progress(-0.5);
        assert_eq!(exp.bloom_progress(), 0.0);
        exp.set_bloom_progress(1.7);
        assert_eq!(exp.bloom_progress(), 1.0);
        exp.set_bloom_progress(f32::NAN);
        assert_eq!(exp.bloom_progress(), 0.0);
    }

    #[test]
    fn bloom_complete_flips_exactly_at_one() {
        let mut exp = Experience::default();
        let mut flips = 0;
        let mut was_complete = false;
        for i in 0..=120 {
            exp.set_bloom_progress(i as f32 / 100.0);
            if exp.bloom_complete() && !was_complete {
                flips += 1;
                assert!(exp.bloom_progress() >= 1.0);
            }
            if was_complete {
                assert!(exp.bloom_complete(), "bloom_complete must not revert");
            }
            was_complete = exp.bloom_complete();
        }
        assert_eq!(flips, 1);
    }

    #[test]
    fn derived_params_track_bloom() {
        let mut exp = Experience::default();
        for x in [0.0_f32, 0.25, 0.5, 0.85, 1.0] {
            exp.set_bloom_progress(x);
            let p = exp.layer_params();
            assert_eq!(p.bloom_intensity(), (0.1 + x * 0.8).min(1.2));
            assert_eq!(p.dof_focus(), 4.0 - x * 1.5);
        }
    }

    #[test]
    fn scene_commit_discards_manual_layer_overrides() {
        let mut exp = Experience::default();
        exp.toggle_layer(LayerKey::Starfield);
        assert!(!exp.active_layers().starfield);
        exp.set_scene(Scene::Chocolate);
        assert!(exp.active_layers().starfield);
        assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Chocolate));
    }

    #[test]
    fn manual_override_survives_until_commit() {
        let mut exp = Experience::default();
        exp.set_layer(LayerKey::Rain, true);
        exp.set_bloom_progress(0.4);
        exp.set_focus_target(FocusTarget::Photo);
        assert!(exp.active_layers().rain);
    }

    #[test]
    fn scene_focus_defaults() {
        let mut exp = Experience::default();
        exp.set_focus_target(FocusTarget::Envelope);
        exp.set_scene(Scene::Climax);
        assert_eq!(exp.focus_target(), FocusTarget::Envelope);
        exp.set_scene(Scene::Chocolate);
        assert_eq!(exp.focus_target(), FocusTarget::Chocolate);
        exp.set_focus_target(FocusTarget::Rose);
        exp.set_scene(Scene::Ending);
        assert_eq!(exp.focus_target(), FocusTarget::Center);
    }

    #[test]
    fn requests_overwrite_and_increase_seq() {
        let mut exp = Experience::default();
        exp.request_scene_transition(Scene::Intro, None);
        let first = exp.pending_transition().map(|p| p.seq);
        exp.request_scene_transition(Scene::Intro, None);
        let second = exp.pending_transition().cloned();
        let second = second.expect("slot should be filled");
        assert_eq!(second.scene, Scene::Intro);
        assert!(Some(second.seq) > first);
        exp.clear_pending_transition();
        assert!(exp.pending_transition().is_none());
    }

    #[test]
    fn request_carries_options() {
        let mut exp = Experience::default();
        let mut opts = TransitionOptions::default();
        opts.insert("origin".into(), "rose".into());
        exp.request_scene_transition(Scene::Flower, Some(opts));
        let pending = exp.pending_transition().expect("pending");
        assert_eq!(pending.options.get("origin").map(String::as_str), Some("rose"));
    }

    #[test]
    fn gift_reveal_clamps_at_three() {
        let mut exp = Experience::default();
        for _ in 0..4 {
            exp.advance_gift_reveal();
        }
        assert_eq!(exp.gift_reveal_stage(), 3);
        exp.reset_gift_reveal();
        assert_eq!(exp.gift_reveal_stage(), 0);
    }

    #[test]
    fn one_way_flags_are_idempotent() {
        let mut exp = Experience::default();
        exp.mark_read_letter();
        exp.mark_read_letter();
        exp.mark_tasted_chocolate();
        exp.mark_tasted_chocolate();
        assert!(exp.has_read_letter());
        assert!(exp.has_tasted_chocolate());
    }

    #[test]
    fn open_count_is_bounded() {
        let mut exp = Experience::default();
        exp.set_open_count(100);
        assert_eq!(exp.open_count(), TOTAL_PETALS);
    }

    #[test]
    fn layer_params_patch_skips_derived_fields() {
        let mut exp = Experience::default();
        exp.set_bloom_progress(0.5);
        exp.set_layer_params([(LayerParam::MeteorCount, 60.0), (LayerParam::Warmth, 0.9)]);
        assert_eq!(exp.layer_params().get(LayerParam::MeteorCount), 60.0);
        assert_eq!(exp.layer_params().get(LayerParam::Warmth), 0.9);
        assert!(approx(exp.layer_params().bloom_intensity(), 0.5));
    }

    #[test]
    fn model_tooling_actions() {
        let mut exp = Experience::default();
        exp.toggle_model_visibility(ModelKey::Mascot);
        assert!(!exp.visible_models().mascot);
        exp.set_model_transform(ModelKey::Photo, TransformField::Scale(2.0));
        assert_eq!(exp.model_transforms().photo.scale, 2.0);
        exp.set_audio_volume(3.0);
        assert_eq!(exp.audio_volume(), 1.0);
    }
}
