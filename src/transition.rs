//! Scene transitions and focus derivation.
//!
//! The [`TransitionController`] turns requests left in the store's pending
//! slot into timed sequences (defer, settle, commit, bloom tween). Alongside
//! it, per-frame reconciliation systems keep the focus target in line with
//! bloom / letter state and story cues, and reset bloom when the experience
//! returns to the prelude.

mod entities;
mod systems;

pub use entities::{SequenceStage, StoryCue, TransitionController, TransitionPhase, Wait};
pub use systems::derived_focus;

use bevy::prelude::*;

use crate::DirectorSet;

/// When an observed request starts running.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub enum DeferPolicy {
    /// Start on the following frame, after pending UI work has flushed.
    NextFrame,
    /// Start after a fixed delay in seconds.
    Delay(f32),
    /// Start in the frame the request is observed.
    Immediate,
}

/// Per-plugin configuration for the transition sequence.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct TransitionConfig {
    /// How a freshly observed request is deferred.
    pub defer: DeferPolicy,
    /// Pause before the scene commit (seconds).
    pub settle_secs: f32,
    /// Duration of the bloom tween after committing `flower` (seconds).
    pub bloom_secs: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            defer: DeferPolicy::NextFrame,
            settle_secs: 0.15,
            bloom_secs: 2.0,
        }
    }
}

/// Transition controller plus the focus / failsafe reconciliation systems.
pub struct TransitionPlugin(pub TransitionConfig);

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TransitionConfig>()
            .register_type::<DeferPolicy>()
            .insert_resource(self.0.clone())
            .init_resource::<TransitionController>()
            .add_message::<StoryCue>()
            .add_systems(
                Update,
                (systems::drive_transitions, systems::prelude_failsafe)
                    .chain()
                    .in_set(DirectorSet::Sequence),
            )
            .add_systems(
                Update,
                (
                    systems::derive_focus_target,
                    systems::focus_on_story_trigger,
                    systems::announce_story_cues,
                )
                    .chain()
                    .in_set(DirectorSet::Focus),
            );
    }
}

#[cfg(test)]
mod tests {
    use std::ops::DerefMut;

    use super::*;
    use crate::store::{Experience, FocusTarget, LayerActivation, Scene};

    const DT: f32 = 1.0 / 60.0;

    fn run_frames<E>(
        ctl: &mut TransitionController,
        exp: &mut E,
        cfg: &TransitionConfig,
        frames: usize,
    ) where
        E: DerefMut<Target = Experience>,
    {
        for _ in 0..frames {
            ctl.step(exp, DT, cfg);
        }
    }

    fn store_at(scene: Scene) -> Box<Experience> {
        let mut exp = Box::<Experience>::default();
        exp.set_scene(scene);
        exp
    }

    #[test]
    fn request_is_deferred_one_frame() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Prelude);
        exp.request_scene_transition(Scene::Intro, None);

        ctl.step(&mut exp, DT, &cfg);
        assert!(matches!(ctl.phase(), TransitionPhase::Scheduled { .. }));
        assert!(!exp.is_animating());

        ctl.step(&mut exp, DT, &cfg);
        assert!(matches!(ctl.phase(), TransitionPhase::Running { .. }));
        assert!(exp.is_animating());
        assert_eq!(exp.current_scene(), Scene::Prelude, "commit waits for settle");
    }

    #[test]
    fn intro_transition_commits_and_clears() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Prelude);
        exp.request_scene_transition(Scene::Intro, None);

        run_frames(&mut ctl, &mut exp, &cfg, 30);

        assert!(ctl.is_idle());
        assert_eq!(exp.current_scene(), Scene::Intro);
        assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Intro));
        assert!(exp.pending_transition().is_none());
        assert!(!exp.is_animating());
    }

    #[test]
    fn flower_transition_tweens_bloom_to_one() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Flower);
        exp.request_scene_transition(Scene::Flower, None);

        let mut last = exp.bloom_progress();
        for _ in 0..200 {
            ctl.step(&mut exp, DT, &cfg);
            assert!(exp.bloom_progress() >= last, "bloom must not regress");
            last = exp.bloom_progress();
            if exp.bloom_progress() > 0.0 && exp.bloom_progress() < 1.0 {
                assert!(exp.is_animating());
            }
        }

        assert!(ctl.is_idle());
        assert_eq!(exp.bloom_progress(), 1.0);
        assert!(exp.bloom_complete());
        assert!(!exp.is_animating());
    }

    #[test]
    fn bloom_tween_takes_its_configured_time() {
        let cfg = TransitionConfig {
            defer: DeferPolicy::Immediate,
            settle_secs: 0.0,
            bloom_secs: 1.0,
        };
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Intro);
        exp.request_scene_transition(Scene::Flower, None);

        run_frames(&mut ctl, &mut exp, &cfg, 30);
        assert!(exp.bloom_progress() > 0.0 && exp.bloom_progress() < 1.0);
        run_frames(&mut ctl, &mut exp, &cfg, 40);
        assert!(exp.bloom_complete());
    }

    #[test]
    fn non_flower_scene_leaves_bloom_alone() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Flower);
        exp.set_bloom_progress(0.4);
        exp.request_scene_transition(Scene::Climax, None);
        run_frames(&mut ctl, &mut exp, &cfg, 30);
        assert_eq!(exp.current_scene(), Scene::Climax);
        assert_eq!(exp.bloom_progress(), 0.4);
    }

    #[test]
    fn newer_request_restarts_sequence() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Intro);
        exp.request_scene_transition(Scene::Flower, None);
        run_frames(&mut ctl, &mut exp, &cfg, 3);
        assert!(matches!(ctl.phase(), TransitionPhase::Running { .. }));

        exp.request_scene_transition(Scene::Climax, None);
        run_frames(&mut ctl, &mut exp, &cfg, 40);

        assert_eq!(exp.current_scene(), Scene::Climax);
        assert!(exp.pending_transition().is_none());
        assert!(!exp.is_animating());
        assert_eq!(exp.bloom_progress(), 0.0, "superseded flower never tweened");
    }

    #[test]
    fn withdrawn_request_drops_animation_flag() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Prelude);
        exp.request_scene_transition(Scene::Intro, None);
        run_frames(&mut ctl, &mut exp, &cfg, 2);
        assert!(exp.is_animating());

        exp.clear_pending_transition();
        ctl.step(&mut exp, DT, &cfg);
        assert!(ctl.is_idle());
        assert!(!exp.is_animating());
        assert_eq!(exp.current_scene(), Scene::Prelude);
    }

    #[test]
    fn reset_to_prelude_interrupts_bloom() {
        let cfg = TransitionConfig::default();
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Intro);
        exp.request_scene_transition(Scene::Flower, None);
        run_frames(&mut ctl, &mut exp, &cfg, 30);
        assert!(matches!(
            ctl.phase(),
            TransitionPhase::Running {
                stage: SequenceStage::Bloom { .. },
                ..
            }
        ));

        exp.set_scene(Scene::Prelude);
        exp.set_bloom_progress(0.0);
        ctl.step(&mut exp, DT, &cfg);

        assert!(ctl.is_idle());
        assert!(exp.pending_transition().is_none());
        assert!(!exp.is_animating());
        assert_eq!(exp.bloom_progress(), 0.0);
    }

    #[test]
    fn fixed_delay_policy_waits() {
        let cfg = TransitionConfig {
            defer: DeferPolicy::Delay(0.05),
            ..default()
        };
        let mut ctl = TransitionController::default();
        let mut exp = store_at(Scene::Prelude);
        exp.request_scene_transition(Scene::Intro, None);
        run_frames(&mut ctl, &mut exp, &cfg, 3);
        assert!(matches!(ctl.phase(), TransitionPhase::Scheduled { .. }));
        run_frames(&mut ctl, &mut exp, &cfg, 30);
        assert_eq!(exp.current_scene(), Scene::Intro);
    }

    #[test]
    fn focus_rules() {
        let mut exp = Experience::default();
        exp.set_scene(Scene::Intro);
        exp.set_bloom_progress(0.9);
        assert_eq!(derived_focus(&exp), None, "intro never looks at the envelope");

        exp.set_scene(Scene::Flower);
        exp.set_bloom_progress(0.6);
        assert_eq!(derived_focus(&exp), None, "threshold is strict");
        exp.set_bloom_progress(0.7);
        assert_eq!(derived_focus(&exp), Some(FocusTarget::Envelope));

        exp.mark_read_letter();
        assert_eq!(derived_focus(&exp), Some(FocusTarget::Photo));
    }
}
