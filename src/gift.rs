//! Gift reveal gating.
//!
//! The reveal stage only moves through [`Experience::advance_gift_reveal`].
//! This module turns the stage plus the letter / scene gates into model
//! visibility and the prompt that offers the next gift.

use crate::store::{ENVELOPE_BLOOM, Experience, MAX_GIFT_STAGE, ModelKey};

/// Which scene models are shown this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ModelVisibility {
    pub rose: bool,
    pub envelope: bool,
    pub mascot: bool,
    pub photo: bool,
    pub chocolate: bool,
}

impl ModelVisibility {
    /// Visibility of `model`.
    pub fn get(&self, model: ModelKey) -> bool {
        match model {
            ModelKey::Rose => self.rose,
            ModelKey::Envelope => self.envelope,
            ModelKey::Mascot => self.mascot,
            ModelKey::Photo => self.photo,
            ModelKey::Chocolate => self.chocolate,
        }
    }
}

/// Story and reveal gates AND-ed with the debug visibility overrides.
///
/// Gifts unlock in order (mascot, photo, chocolate) at stages 1, 2 and 3,
/// and only once the letter is read and the scene is `climax` or later, so
/// the stage may advance before anything shows.
pub fn model_visibility(exp: &Experience) -> ModelVisibility {
    let debug = exp.visible_models();
    let scene = exp.current_scene();
    let unlocked = exp.has_read_letter() && scene.is_climax_or_later();
    let stage = exp.gift_reveal_stage();

    ModelVisibility {
        rose: debug.rose,
        envelope: exp.bloom_progress() >= ENVELOPE_BLOOM
            && scene.is_flower_or_later()
            && debug.envelope,
        mascot: unlocked && stage >= 1 && debug.mascot,
        photo: unlocked && stage >= 2 && debug.photo,
        chocolate: unlocked && stage >= 3 && debug.chocolate,
    }
}

/// Copy of the "next gift" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftPrompt {
    /// Stage the prompt advances from.
    pub stage: u8,
    /// Card heading.
    pub title: &'static str,
    /// Line under the heading.
    pub description: &'static str,
    /// Button copy.
    pub button: &'static str,
}

/// Prompt offering the next gift, while any remain and the gifts are
/// unlocked.
pub fn gift_prompt(exp: &Experience) -> Option<GiftPrompt> {
    let stage = exp.gift_reveal_stage();
    if !exp.has_read_letter()
        || !exp.current_scene().is_climax_or_later()
        || stage >= MAX_GIFT_STAGE
    {
        return None;
    }
    let (title, description, button) = match stage {
        0 => ("A special friend...", "is bringing you a gift", "Meet this friend"),
        1 => ("Beautiful moments", "Our memories together", "View memories"),
        _ => ("Sweet like you", "Valentine chocolate, just for you", "Receive chocolate"),
    };
    Some(GiftPrompt {
        stage,
        title,
        description,
        button,
    })
}
