use bevy::prelude::*;

use super::TransitionConfig;
use super::entities::{StoryCue, TransitionController};
use crate::store::{Experience, FocusTarget, Scene};
use crate::story::{STORY_LINES, StoryTrigger};

/// Bloom level past which the director looks at the envelope.
const ENVELOPE_FOCUS_BLOOM: f32 = 0.6;

/// Steps the transition controller by the frame delta.
pub fn drive_transitions(
    time: Res<Time>,
    cfg: Res<TransitionConfig>,
    mut ctl: ResMut<TransitionController>,
    mut exp: ResMut<Experience>,
) {
    ctl.step(&mut exp, time.delta_secs(), &cfg);
}

/// Zeroes bloom, petals and story when the committed scene falls back to
/// `prelude`.
pub fn prelude_failsafe(mut last: Local<Option<Scene>>, mut exp: ResMut<Experience>) {
    let scene = exp.current_scene();
    let entered = scene == Scene::Prelude && *last != Some(Scene::Prelude);
    *last = Some(scene);
    if !entered {
        return;
    }
    if exp.bloom_progress() > 0.0 || exp.open_count() > 0 || exp.story_step() > 0 {
        info!("back in prelude, resetting bloom and story");
        exp.set_bloom_progress(0.0);
        exp.set_open_count(0);
        exp.reset_story();
    }
}

/// Focus target implied by bloom and letter state, if any.
///
/// A read letter always wins; otherwise the envelope is framed once bloom
/// passes 0.6 in any scene after `intro`.
pub fn derived_focus(exp: &Experience) -> Option<FocusTarget> {
    if exp.has_read_letter() {
        return Some(FocusTarget::Photo);
    }
    let early = matches!(exp.current_scene(), Scene::Prelude | Scene::Intro);
    (exp.bloom_progress() > ENVELOPE_FOCUS_BLOOM && !early).then_some(FocusTarget::Envelope)
}

/// Re-asserts [`derived_focus`] whenever one of its inputs (bloom, letter
/// flag, committed scene) changes, writing only when the result differs from
/// the stored target. Targets set by other writers hold until then.
pub fn derive_focus_target(
    mut seen: Local<Option<(u32, bool, Scene)>>,
    mut exp: ResMut<Experience>,
) {
    let inputs = (
        exp.bloom_progress().to_bits(),
        exp.has_read_letter(),
        exp.current_scene(),
    );
    if *seen == Some(inputs) {
        return;
    }
    *seen = Some(inputs);

    let Some(target) = derived_focus(&exp) else {
        return;
    };
    if exp.focus_target() != target {
        debug!("focus derived: {target:?}");
        exp.set_focus_target(target);
    }
}

/// Edge-triggered on story step changes: a `chocolate` line moves focus to
/// the chocolate and emits the matching cue.
pub fn focus_on_story_trigger(
    mut last_step: Local<Option<usize>>,
    mut exp: ResMut<Experience>,
    mut cues: MessageWriter<StoryCue>,
) {
    let step = exp.story_step();
    if *last_step == Some(step) {
        return;
    }
    *last_step = Some(step);

    let Some(line) = STORY_LINES.get(step) else {
        return;
    };
    if line.trigger == StoryTrigger::Chocolate {
        exp.set_focus_target(FocusTarget::Chocolate);
        cues.write(StoryCue::Chocolate);
    }
}

/// Audio playback is not part of the director; cues are only logged.
pub fn announce_story_cues(mut cues: MessageReader<StoryCue>) {
    for cue in cues.read() {
        info!("story cue: {cue:?}");
    }
}
