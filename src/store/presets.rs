//! Scene → ambient layer presets.

use super::entities::{LayerActivation, Scene};

const fn preset(
    starfield: bool,
    film_grain: bool,
    light_pulse: bool,
    meteor: bool,
    letter: bool,
    hearts: bool,
    floating_words: bool,
) -> LayerActivation {
    LayerActivation {
        starfield,
        film_grain,
        light_pulse,
        meteor,
        rain: false,
        letter,
        hearts,
        floating_words,
    }
}

const PRELUDE: LayerActivation = preset(true, true, false, false, false, false, false);
const INTRO: LayerActivation = preset(true, true, true, false, false, true, true);
const FLOWER: LayerActivation = preset(true, true, true, false, true, true, true);
const CLIMAX: LayerActivation = preset(true, true, true, true, true, true, true);
const CHOCOLATE: LayerActivation = preset(true, false, true, false, true, true, true);
const ENDING: LayerActivation = preset(true, false, false, false, false, true, true);

impl LayerActivation {
    /// Complete layer preset for `scene`.
    pub const fn for_scene(scene: Scene) -> Self {
        match scene {
            Scene::Prelude => PRELUDE,
            Scene::Intro => INTRO,
            Scene::Flower => FLOWER,
            Scene::Climax => CLIMAX,
            Scene::Chocolate => CHOCOLATE,
            Scene::Ending => ENDING,
        }
    }

    /// Preset for a textual scene key. Unknown keys resolve to the `prelude`
    /// preset.
    pub fn for_scene_key(key: &str) -> Self {
        key.parse::<Scene>()
            .map(Self::for_scene)
            .unwrap_or(PRELUDE)
    }
}
