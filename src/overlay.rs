//! On-screen overlay: story caption, letter card, gift prompt and the few
//! buttons that drive the experience forward.
//!
//! The egui pass only collects [`OverlayAction`]s; they are applied to the
//! store after the UI is built.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::gift::{gift_prompt, model_visibility};
use crate::story::{CaptionLayout, Emphasis, StoryCaption};
use crate::store::{Experience, MAX_GIFT_STAGE, Scene};

const LETTER: &str = "Every petal on this rose opened because of you.\n\n\
    Thank you for the laughter, the patience and the quiet evenings.\n\
    There is a little more waiting for you, so keep going.";

/// Button pressed in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Open the letter card.
    OpenLetter,
    /// Close the letter and move on to the climax.
    CloseLetter,
    /// Reveal the next gift.
    NextGift,
    /// Taste the chocolate.
    TasteChocolate,
    /// Go to the ending.
    Finale,
    /// Start over from the prelude.
    Restart,
    /// Toggle background music.
    ToggleAudio,
}

/// Overlay configuration.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct OverlayConfig {
    /// Base caption font size (points).
    pub caption_size: f32,
    /// Caption color.
    pub caption_color: [u8; 3],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            caption_size: 26.0,
            caption_color: [255, 228, 235],
        }
    }
}

/// egui overlay over the stage.
pub struct OverlayPlugin(pub OverlayConfig);

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OverlayConfig>()
            .insert_resource(self.0.clone())
            .add_systems(EguiPrimaryContextPass, draw_overlay);
    }
}

/// Story buttons on offer right now. The audio toggle is always available
/// and not listed.
pub fn offered_actions(exp: &Experience) -> Vec<OverlayAction> {
    let mut actions = Vec::new();
    let scene = exp.current_scene();
    if exp.is_reading_letter() {
        actions.push(OverlayAction::CloseLetter);
    } else if model_visibility(exp).envelope && !exp.has_read_letter() {
        actions.push(OverlayAction::OpenLetter);
    }
    if gift_prompt(exp).is_some() {
        actions.push(OverlayAction::NextGift);
    }
    if scene == Scene::Climax
        && exp.gift_reveal_stage() >= MAX_GIFT_STAGE
        && !exp.has_tasted_chocolate()
    {
        actions.push(OverlayAction::TasteChocolate);
    }
    if scene == Scene::Chocolate && exp.has_tasted_chocolate() {
        actions.push(OverlayAction::Finale);
    }
    if scene == Scene::Ending {
        actions.push(OverlayAction::Restart);
    }
    actions
}

/// Applies one overlay action to the store.
pub fn apply_action(exp: &mut Experience, action: OverlayAction) {
    match action {
        OverlayAction::OpenLetter => exp.set_reading_letter(true),
        OverlayAction::CloseLetter => {
            exp.set_reading_letter(false);
            exp.mark_read_letter();
            exp.request_scene_transition(Scene::Climax, None);
        }
        OverlayAction::NextGift => exp.advance_gift_reveal(),
        OverlayAction::TasteChocolate => {
            exp.mark_tasted_chocolate();
            exp.request_scene_transition(Scene::Chocolate, None);
        }
        OverlayAction::Finale => exp.request_scene_transition(Scene::Ending, None),
        OverlayAction::Restart => {
            exp.reset_gift_reveal();
            exp.request_scene_transition(Scene::Prelude, None);
        }
        OverlayAction::ToggleAudio => exp.toggle_audio(),
    }
}

fn caption_anchor(layout: CaptionLayout) -> (egui::Align2, [f32; 2]) {
    match layout {
        CaptionLayout::TopCenter => (egui::Align2::CENTER_TOP, [0.0, 48.0]),
        CaptionLayout::TopLeft => (egui::Align2::LEFT_TOP, [48.0, 48.0]),
        CaptionLayout::TopRight => (egui::Align2::RIGHT_TOP, [-48.0, 48.0]),
        CaptionLayout::Center => (egui::Align2::CENTER_CENTER, [0.0, 0.0]),
        CaptionLayout::BottomCenter => (egui::Align2::CENTER_BOTTOM, [0.0, -64.0]),
    }
}

fn emphasis_scale(emphasis: Emphasis) -> f32 {
    match emphasis {
        Emphasis::Whisper => 0.8,
        Emphasis::Normal => 1.0,
        Emphasis::Grand => 1.35,
        Emphasis::Dramatic => 1.6,
    }
}

fn action_label(action: OverlayAction, exp: &Experience) -> &'static str {
    match action {
        OverlayAction::OpenLetter => "Open the letter",
        OverlayAction::CloseLetter => "Close",
        OverlayAction::NextGift => gift_prompt(exp).map_or("Next", |p| p.button),
        OverlayAction::TasteChocolate => "Taste it",
        OverlayAction::Finale => "One last thing",
        OverlayAction::Restart => "Watch again",
        OverlayAction::ToggleAudio => {
            if exp.audio_playing() {
                "Music off"
            } else {
                "Music on"
            }
        }
    }
}

fn draw_overlay(
    mut contexts: EguiContexts,
    time: Res<Time>,
    cfg: Res<OverlayConfig>,
    caption: Res<StoryCaption>,
    mut exp: ResMut<Experience>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let [r, g, b] = cfg.caption_color;
    let ink = egui::Color32::from_rgb(r, g, b);
    let mut clicked = Vec::new();

    if let Some(line) = caption.line() {
        let (align, offset) = caption_anchor(line.layout);
        let size = cfg.caption_size * emphasis_scale(line.emphasis);
        egui::Area::new(egui::Id::new("story_caption"))
            .anchor(align, offset)
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    let mut text = egui::RichText::new(line.text).size(size).color(ink);
                    if line.emphasis == Emphasis::Whisper {
                        text = text.italics();
                    }
                    ui.label(text);
                    if !line.subtext.is_empty() {
                        ui.label(egui::RichText::new(line.subtext).size(size * 0.6).color(ink));
                    }
                });
            });
    }

    let offered = offered_actions(&exp);

    if exp.is_reading_letter() {
        egui::Window::new("A letter for you")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(LETTER).size(18.0));
                ui.add_space(12.0);
                if ui.button(action_label(OverlayAction::CloseLetter, &exp)).clicked() {
                    clicked.push(OverlayAction::CloseLetter);
                }
            });
    }

    if let Some(prompt) = gift_prompt(&exp) {
        egui::Window::new(prompt.title)
            .id(egui::Id::new("gift_prompt"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -32.0])
            .show(ctx, |ui| {
                ui.label(prompt.description);
                if ui.button(prompt.button).clicked() {
                    clicked.push(OverlayAction::NextGift);
                }
            });
    }

    egui::Area::new(egui::Id::new("overlay_buttons"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            for action in offered.iter().copied().filter(|a| {
                !matches!(a, OverlayAction::CloseLetter | OverlayAction::NextGift)
            }) {
                if ui.button(action_label(action, &exp)).clicked() {
                    clicked.push(action);
                }
            }
            if ui
                .button(action_label(OverlayAction::ToggleAudio, &exp))
                .clicked()
            {
                clicked.push(OverlayAction::ToggleAudio);
            }
        });

    if exp.show_fps() {
        let dt = time.delta_secs();
        let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        egui::Area::new(egui::Id::new("fps"))
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("{fps:.0} fps")).monospace());
            });
    }

    for action in clicked {
        info!("overlay: {action:?}");
        apply_action(&mut exp, action);
    }
    Ok(())
}
