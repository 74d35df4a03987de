use bevy::prelude::*;

use super::StoryConfig;
use super::script::{STORY_LINES, StoryLine};

/// Fade timing of the caption card for the current story line.
///
/// Restarts whenever the story step changes: hidden for
/// [`StoryConfig::caption_delay_secs`], shown for the hold time, then hidden
/// again. Lines without a duration stay up once shown.
#[derive(Resource, Debug, Default)]
pub struct StoryCaption {
    step: Option<usize>,
    elapsed: f32,
    visible: bool,
}

impl StoryCaption {
    /// Line currently on screen.
    pub fn line(&self) -> Option<&'static StoryLine> {
        if !self.visible {
            return None;
        }
        self.step.and_then(|step| STORY_LINES.get(step))
    }

    /// `true` while a caption is on screen.
    pub fn is_visible(&self) -> bool {
        self.line().is_some()
    }

    pub(super) fn tick(&mut self, step: usize, frozen: bool, dt: f32, cfg: &StoryConfig) {
        if self.step != Some(step) {
            self.step = Some(step);
            self.elapsed = 0.0;
        } else {
            self.elapsed += dt;
        }

        let Some(line) = STORY_LINES.get(step) else {
            self.visible = false;
            return;
        };
        let shown = self.elapsed >= cfg.caption_delay_secs;
        let expired = line
            .duration
            .is_some_and(|_| self.elapsed >= cfg.caption_delay_secs + cfg.caption_hold_secs);
        self.visible = !frozen && shown && !expired;
    }
}
