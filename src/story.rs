//! Story progression driver.
//!
//! Walks a fixed six-line script forward one step at a time. Each step is
//! gated by a predicate over the store (bloom, letter, chocolate, scene);
//! the driver never moves backwards on its own. [`StoryCaption`] times the
//! caption card for the current line.

mod entities;
mod script;
mod systems;

pub use entities::StoryCaption;
pub use script::{CaptionLayout, Emphasis, STORY_LINES, StoryLine, StoryTrigger, first_step_of};
pub use systems::next_story_step;

use bevy::prelude::*;

use crate::DirectorSet;
use crate::store::not_frozen;

/// Caption timing for the story overlay.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct StoryConfig {
    /// Delay before a new line's caption appears (seconds).
    pub caption_delay_secs: f32,
    /// How long a caption stays up once shown (seconds).
    pub caption_hold_secs: f32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            caption_delay_secs: 0.7,
            caption_hold_secs: 5.0,
        }
    }
}

/// Story step driver plus caption timing.
pub struct StoryPlugin(pub StoryConfig);

impl Plugin for StoryPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<StoryConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<StoryCaption>()
            .add_systems(Startup, systems::seed_story_from_scene)
            .add_systems(
                Update,
                (
                    systems::advance_story.run_if(not_frozen),
                    systems::track_caption,
                )
                    .chain()
                    .in_set(DirectorSet::Story),
            );
    }
}
