use bevy::prelude::*;

use super::StoryConfig;
use super::entities::StoryCaption;
use super::script::{STORY_LINES, first_step_of};
use crate::store::{ENVELOPE_BLOOM, Experience, Scene};

/// Step the story should move to, if the current step's predicate holds.
///
/// Only the predicate of the current step is evaluated, so at most one step
/// is taken per call. Steps past the chocolate tasting only move through
/// explicit jumps.
pub fn next_story_step(exp: &Experience) -> Option<usize> {
    let step = exp.story_step();
    let ready = match step {
        0 => exp.bloom_progress() >= ENVELOPE_BLOOM && exp.current_scene() == Scene::Flower,
        1 => exp.has_read_letter() && exp.current_scene().is_climax_or_later(),
        2 => exp.has_tasted_chocolate(),
        _ => false,
    };
    ready.then_some(step + 1)
}

/// Applies [`next_story_step`].
pub fn advance_story(mut exp: ResMut<Experience>) {
    if let Some(next) = next_story_step(&exp) {
        let id = STORY_LINES.get(next).map_or("-", |line| line.id);
        debug!("story step {next} ({id})");
        exp.next_story_step();
    }
}

/// Starting past the prelude jumps the story to the scene's first line.
pub fn seed_story_from_scene(mut exp: ResMut<Experience>) {
    let step = first_step_of(exp.current_scene());
    if step != exp.story_step() {
        info!("story starts at step {step} for {}", exp.current_scene());
        exp.set_story_step(step);
    }
}

pub fn track_caption(
    time: Res<Time>,
    cfg: Res<StoryConfig>,
    exp: Res<Experience>,
    mut caption: ResMut<StoryCaption>,
) {
    caption.tick(exp.story_step(), exp.is_frozen(), time.delta_secs(), &cfg);
}
